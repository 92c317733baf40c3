//! Contains validation logic for the final Config struct.

use super::{Config, Result};
use crate::core::error::AppError;
use std::collections::HashMap;

/// Upper bound (seconds) for either end of the search delay range.
const MAX_SEARCH_SLEEP_SECS: f32 = 3600.0;

/// Validates the configuration after loading and overrides.
/// Clamps or normalizes values where that is unambiguous, errors otherwise.
pub(crate) fn validate_config(config: &mut Config) -> Result<()> {
    let (min_sleep, max_sleep) = config.sleep_between_searches;
    if !min_sleep.is_finite() || !max_sleep.is_finite() {
        return Err(AppError::Config(format!(
            "Sleep durations must be finite numbers (got {} and {}).",
            min_sleep, max_sleep
        )));
    }
    if min_sleep < 0.0 || max_sleep < 0.0 {
        return Err(AppError::Config(
            "Sleep durations cannot be negative.".to_string(),
        ));
    }
    if min_sleep > MAX_SEARCH_SLEEP_SECS || max_sleep > MAX_SEARCH_SLEEP_SECS {
        return Err(AppError::Config(format!(
            "Sleep durations cannot exceed {}s.",
            MAX_SEARCH_SLEEP_SECS
        )));
    }
    if config.sleep_between_searches.0 > config.sleep_between_searches.1 {
        tracing::warn!(
            "Min sleep ({:.2}s) > Max sleep ({:.2}s). Setting max sleep = min sleep.",
            config.sleep_between_searches.0,
            config.sleep_between_searches.1
        );
        config.sleep_between_searches.1 = config.sleep_between_searches.0;
    }
    if config.request_timeout.is_zero() || config.site_probe_timeout.is_zero() {
        return Err(AppError::Config(
            "Request timeouts must be greater than zero.".to_string(),
        ));
    }
    if config.search_results_per_query == 0 {
        tracing::warn!("Results per query was set to 0. Setting to 1.");
        config.search_results_per_query = 1;
    }
    if config.discovery_search_results == 0 {
        tracing::warn!("Discovery search results was set to 0. Setting to 1.");
        config.discovery_search_results = 1;
    }
    if url::Url::parse(&config.search_url).is_err() {
        return Err(AppError::Config(format!(
            "Invalid search URL: {}",
            config.search_url
        )));
    }
    if url::Url::parse(&config.hunter_api_url).is_err() {
        return Err(AppError::Config(format!(
            "Invalid enrichment API URL: {}",
            config.hunter_api_url
        )));
    }
    if config.profile_site.is_empty() {
        tracing::warn!("Profile site is empty. Disabling profile-network search.");
        config.enable_profile_search = false;
    }
    if config
        .hunter_api_key
        .as_deref()
        .is_some_and(|k| k.trim().is_empty())
    {
        tracing::warn!("Provided enrichment API key is empty. It will be ignored.");
        config.hunter_api_key = None;
    }
    config
        .skipped_result_domains
        .retain(|d| !d.trim().is_empty());

    let mut aliases = HashMap::with_capacity(config.domain_aliases.len());
    for (vanity, corporate) in config.domain_aliases.drain() {
        let vanity = vanity.trim().to_lowercase();
        let corporate = corporate.trim().to_lowercase();
        if vanity.is_empty() || corporate.is_empty() {
            tracing::warn!("Ignoring incomplete domain alias '{}' -> '{}'.", vanity, corporate);
            continue;
        }
        aliases.insert(vanity, corporate);
    }
    config.domain_aliases = aliases;

    Ok(())
}
