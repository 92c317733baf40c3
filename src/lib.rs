//! # Email Enricher Core Library
//!
//! This crate infers the most likely professional email address for a contact
//! from a first name, a last name and a company website. It is used directly as
//! a library or through the `email-enricher` command-line tool.
//!
//! Each record runs through a cascade of increasingly generic strategies: a
//! direct web search, a professional-network profile search, a per-domain
//! pattern learned from observed addresses, and finally heuristic candidates.
//! The first address not already used in the run is committed.

mod core;
mod discovery;
mod sources;
mod utils;

pub use crate::core::config::{Config, ConfigBuilder, ConfigFile};
pub use crate::core::enricher::EmailEnricher;
pub use crate::core::error::{AppError, Result};
pub use crate::core::models::{
    Contact, EmailSource, EnrichmentOutcome, Pattern, PatternCacheEntry,
};
pub use crate::core::session::{EnrichmentSession, PatternCache, UsedEmails};
pub use crate::sources::{
    EnrichmentApi, FetchedPage, GoogleSearch, HttpFetcher, HunterClient, PageFetcher,
    SearchEngine, Sources,
};
pub use crate::utils::domain::{canonical_domain, normalize_domain, resolve_alias};
pub use crate::utils::extract::extract_emails;
pub use crate::utils::patterns::{
    build_email_from_pattern, build_email_from_tag, clean_name, generate_candidates,
};

use std::sync::Arc;

/// Creates an `EmailEnricher` backed by the live HTTP sources.
pub fn initialize_enricher(config: Arc<Config>) -> Result<EmailEnricher> {
    EmailEnricher::new(config)
}
