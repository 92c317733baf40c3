use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::models::{Contact, EmailSource, EnrichmentOutcome, ValidatedContact};
use crate::core::session::EnrichmentSession;
use crate::discovery::direct_search::find_email_via_search;
use crate::discovery::pattern::discover_pattern;
use crate::discovery::profile::find_email_via_profile;
use crate::sources::Sources;
use crate::utils::domain::canonical_domain;
use crate::utils::patterns::{build_email_from_pattern, clean_name, generate_candidates};

use std::sync::Arc;
use std::time::Instant;

/// The main struct orchestrating email inference over a batch of contacts.
///
/// Holds the network sources and the session state (used addresses and the
/// pattern cache). Records are processed one at a time.
pub struct EmailEnricher {
    config: Arc<Config>,
    sources: Sources,
    session: EnrichmentSession,
}

impl EmailEnricher {
    /// Creates an enricher backed by the live HTTP sources.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        tracing::debug!("Initializing EmailEnricher components...");
        let sources = Sources::live(&config)?;
        if sources.enrichment_api.is_some() {
            tracing::info!("Enrichment API key configured; domain-search lookups enabled.");
        }
        tracing::info!("EmailEnricher initialized successfully.");
        Ok(Self::with_sources(config, sources))
    }

    /// Creates an enricher with explicit sources and a fresh session.
    pub fn with_sources(config: Arc<Config>, sources: Sources) -> Self {
        Self::with_session(config, sources, EnrichmentSession::new())
    }

    /// Creates an enricher that continues from an existing session.
    pub fn with_session(config: Arc<Config>, sources: Sources, session: EnrichmentSession) -> Self {
        Self {
            config,
            sources,
            session,
        }
    }

    pub fn session(&self) -> &EnrichmentSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EnrichmentSession {
        &mut self.session
    }

    pub fn into_session(self) -> EnrichmentSession {
        self.session
    }

    /// Fills missing emails across `contacts`, returning them in the same order.
    pub async fn enrich_contacts(&mut self, mut contacts: Vec<Contact>) -> Vec<Contact> {
        self.enrich_batch(&mut contacts, |_, _| {}).await;
        contacts
    }

    /// Fills missing emails in place and reports each record's outcome to `on_record`.
    ///
    /// The used-email set is seeded from the batch's pre-existing addresses before
    /// any record is processed.
    pub async fn enrich_batch<F>(
        &mut self,
        contacts: &mut [Contact],
        mut on_record: F,
    ) -> Vec<EnrichmentOutcome>
    where
        F: FnMut(&Contact, &EnrichmentOutcome),
    {
        self.session
            .used_emails
            .seed(contacts.iter().filter_map(|c| c.email.as_deref()));
        tracing::info!(
            "Starting enrichment of {} records ({} addresses already in use).",
            contacts.len(),
            self.session.used_emails.len()
        );

        let mut outcomes = Vec::with_capacity(contacts.len());
        for contact in contacts.iter_mut() {
            let outcome = self.enrich_contact(contact).await;
            on_record(contact, &outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Infers an email for one record and writes it back if one is committed.
    pub async fn enrich_contact(&mut self, contact: &mut Contact) -> EnrichmentOutcome {
        if contact.has_email() {
            return EnrichmentOutcome::AlreadyPresent;
        }

        let validated = match self.validate_contact(contact) {
            Ok(v) => v,
            Err(reason) => {
                tracing::debug!(target: "enrich_task", "Skipping record. Reason: {}", reason);
                return EnrichmentOutcome::Skipped(reason);
            }
        };

        let task_label = format!(
            "{} {} @ {}",
            validated.first_name, validated.last_name, validated.domain
        );
        tracing::info!(target: "enrich_task", "[{}] Starting email inference", task_label);
        let start_time = Instant::now();

        let outcome = match self.find_email(&validated, &task_label).await {
            Some((email, source)) => {
                contact.email = Some(email.clone());
                EnrichmentOutcome::Filled { email, source }
            }
            None => {
                tracing::info!(target: "enrich_task", "[{}] No unused candidate found.", task_label);
                EnrichmentOutcome::NoMatch
            }
        };

        tracing::info!(target: "enrich_task", "[{}] Finished in {:.2?}: {:?}",
            task_label, start_time.elapsed(), outcome);
        outcome
    }

    /// Runs the cascade and commits the first address not already in use.
    async fn find_email(
        &mut self,
        contact: &ValidatedContact,
        task_label: &str,
    ) -> Option<(String, EmailSource)> {
        let company = contact.company_name.as_deref();

        if self.config.enable_direct_search {
            let found = find_email_via_search(
                &self.config,
                &self.sources,
                &contact.first_name,
                &contact.last_name,
                company,
            )
            .await;
            if let Some(email) = found.and_then(|e| self.commit(&e, task_label)) {
                return Some((email, EmailSource::DirectSearch));
            }
        }

        if self.config.enable_profile_search {
            let found = find_email_via_profile(
                &self.config,
                &self.sources,
                &contact.first_name,
                &contact.last_name,
                company,
                Some(&contact.domain),
            )
            .await;
            if let Some(email) = found.and_then(|e| self.commit(&e, task_label)) {
                return Some((email, EmailSource::ProfileNetwork));
            }
        }

        let entry = discover_pattern(
            &self.config,
            &self.sources,
            &mut self.session.pattern_cache,
            &contact.domain,
        )
        .await;

        let first_clean = clean_name(&contact.first_name);
        let last_clean = clean_name(&contact.last_name);
        if let Some(pattern) = entry.pattern {
            if !first_clean.is_empty() && !last_clean.is_empty() {
                let candidate = build_email_from_pattern(
                    &first_clean,
                    &last_clean,
                    &entry.canonical_domain,
                    pattern,
                );
                if let Some(email) = self.commit(&candidate, task_label) {
                    return Some((email, EmailSource::DiscoveredPattern));
                }
            }
        }

        for candidate in generate_candidates(
            &contact.first_name,
            &contact.last_name,
            &entry.canonical_domain,
        ) {
            if let Some(email) = self.commit(&candidate, task_label) {
                return Some((email, EmailSource::Heuristic));
            }
        }
        None
    }

    /// Normalizes `candidate` and claims it. Returns `None` if it is already in use.
    fn commit(&mut self, candidate: &str, task_label: &str) -> Option<String> {
        let email: String = candidate
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if email.is_empty() {
            return None;
        }
        if self.session.used_emails.claim(&email) {
            tracing::info!(target: "enrich_task", "[{}] Committed {}", task_label, email);
            Some(email)
        } else {
            tracing::debug!(target: "enrich_task", "[{}] Rejected duplicate candidate {}", task_label, email);
            None
        }
    }

    fn validate_contact(&self, record: &Contact) -> std::result::Result<ValidatedContact, String> {
        let first_name = record.first_name.as_deref().unwrap_or("").trim().to_string();
        let last_name = record.last_name.as_deref().unwrap_or("").trim().to_string();
        let domain = canonical_domain(record.website.as_deref(), &self.config.domain_aliases);

        let mut missing_parts = Vec::new();
        if first_name.is_empty() {
            missing_parts.push("first name");
        }
        if last_name.is_empty() {
            missing_parts.push("last name");
        }
        if domain.is_none() {
            missing_parts.push("domain");
        }

        match domain {
            Some(domain) if missing_parts.is_empty() => Ok(ValidatedContact {
                first_name,
                last_name,
                company_name: record
                    .company_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
                domain,
            }),
            _ => Err(format!("Missing {}", missing_parts.join(", "))),
        }
    }
}
