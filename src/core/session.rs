//! Per-run state shared across records: the used-email set and the pattern cache.

use crate::core::models::PatternCacheEntry;
use std::collections::{HashMap, HashSet};

/// Addresses already assigned in the current run (lowercase).
#[derive(Debug, Default, Clone)]
pub struct UsedEmails {
    emails: HashSet<String>,
}

impl UsedEmails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the set from pre-existing values; blank values are ignored.
    pub fn seed<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        for email in existing {
            let email = email.trim().to_lowercase();
            if !email.is_empty() {
                self.emails.insert(email);
            }
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.to_lowercase())
    }

    /// Claims `email` for a record. Returns `false` if it was already taken.
    pub fn claim(&mut self, email: &str) -> bool {
        self.emails.insert(email.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Read-through cache of discovery results keyed by input domain.
/// No eviction; an entry is written at most once.
#[derive(Debug, Default, Clone)]
pub struct PatternCache {
    entries: HashMap<String, PatternCacheEntry>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str) -> Option<&PatternCacheEntry> {
        self.entries.get(domain)
    }

    /// Stores `entry` unless the domain already has one. Returns the stored entry.
    pub fn insert(&mut self, domain: &str, entry: PatternCacheEntry) -> &PatternCacheEntry {
        self.entries.entry(domain.to_string()).or_insert(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State for one enrichment run.
#[derive(Debug, Default, Clone)]
pub struct EnrichmentSession {
    pub used_emails: UsedEmails,
    pub pattern_cache: PatternCache,
}

impl EnrichmentSession {
    pub fn new() -> Self {
        Self::default()
    }
}
