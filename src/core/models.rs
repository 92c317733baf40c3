//! Data structures for contact records, patterns and per-record outcomes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A contact row as read from the lead list.
///
/// Field names follow the dataset's column names. Any additional columns are
/// carried through untouched in `other_fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    #[serde(rename = "contact_first_name", default)]
    pub first_name: Option<String>,
    #[serde(rename = "contact_last_name", default)]
    pub last_name: Option<String>,
    #[serde(rename = "account_name", default)]
    pub company_name: Option<String>,
    #[serde(rename = "account_website", default)]
    pub website: Option<String>,
    #[serde(rename = "contact_email", default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub other_fields: HashMap<String, serde_json::Value>,
}

impl Contact {
    /// Convenience constructor used by the CLI and tests.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        website: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            website: Some(website.into()),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// True when the record already carries a non-blank email.
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// Record fields after trimming and domain normalization.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedContact {
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub domain: String,
}

/// How a company forms employee addresses from a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `john.doe`
    FirstDotLast,
    /// `johndoe`
    FirstLast,
    /// `johnd`
    FirstL,
    /// `jdoe`
    FLast,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::FirstDotLast,
        Pattern::FirstLast,
        Pattern::FirstL,
        Pattern::FLast,
    ];

    pub fn as_tag(&self) -> &'static str {
        match self {
            Pattern::FirstDotLast => "first.last",
            Pattern::FirstLast => "firstlast",
            Pattern::FirstL => "firstl",
            Pattern::FLast => "flast",
        }
    }

    /// Parses a pattern tag. Accepts the short tags (`first.last`) as well as the
    /// template notation returned by the enrichment API (`{first}.{last}`).
    /// Unrecognized tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "first.last" | "{first}.{last}" => Some(Pattern::FirstDotLast),
            "firstlast" | "{first}{last}" => Some(Pattern::FirstLast),
            "firstl" | "{first}{l}" => Some(Pattern::FirstL),
            "flast" | "{f}{last}" => Some(Pattern::FLast),
            _ => None,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Result of pattern discovery for one input domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCacheEntry {
    pub pattern: Option<Pattern>,
    pub canonical_domain: String,
}

/// Which stage of the cascade produced a committed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailSource {
    DirectSearch,
    ProfileNetwork,
    DiscoveredPattern,
    Heuristic,
}

impl fmt::Display for EmailSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailSource::DirectSearch => write!(f, "direct search"),
            EmailSource::ProfileNetwork => write!(f, "profile network"),
            EmailSource::DiscoveredPattern => write!(f, "discovered pattern"),
            EmailSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// What happened to a single record during enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// An address was committed to the record.
    Filled { email: String, source: EmailSource },
    /// The record already had an email; nothing was touched.
    AlreadyPresent,
    /// Name or domain missing; the record was left alone.
    Skipped(String),
    /// Every source was exhausted or every candidate was already taken.
    NoMatch,
}

impl EnrichmentOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, EnrichmentOutcome::Filled { .. })
    }
}
