//! Handles loading configuration from files and applying it to the Config struct.

use super::{Config, ConfigFile};
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Loads configuration settings from a TOML file.
pub(crate) fn load_config_file(file_path: &str) -> anyhow::Result<ConfigFile> {
    let path = Path::new(file_path);
    if !path.is_file() {
        return Err(anyhow::anyhow!(
            "File not found or is not a file: {}",
            file_path
        ));
    }
    tracing::debug!("Attempting to read config file: {}", file_path);
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", file_path))?;

    let config_file_content: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML configuration from {}", file_path))?;

    tracing::debug!("Successfully parsed configuration file: {}", file_path);
    Ok(config_file_content)
}

/// Merges the settings present in `file_config` onto `config`.
pub(crate) fn apply_file_config(config: &mut Config, file_config: &ConfigFile) {
    // Network
    if let Some(timeout) = file_config.network.request_timeout {
        config.request_timeout = Duration::from_secs(timeout);
    }
    if let Some(timeout) = file_config.network.site_probe_timeout {
        config.site_probe_timeout = Duration::from_secs(timeout);
    }
    if let Some(ref user_agent) = file_config.network.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(min_sleep) = file_config.network.min_sleep {
        config.sleep_between_searches.0 = min_sleep;
    }
    if let Some(max_sleep) = file_config.network.max_sleep {
        config.sleep_between_searches.1 = max_sleep;
    }

    // Search
    if let Some(ref url) = file_config.search.search_url {
        config.search_url = url.trim().to_string();
    }
    if let Some(n) = file_config.search.results_per_query {
        config.search_results_per_query = n;
    }
    if let Some(n) = file_config.search.discovery_results {
        config.discovery_search_results = n;
    }
    if let Some(ref domains) = file_config.search.skipped_domains {
        config.skipped_result_domains = domains.clone();
    }
    if let Some(ref site) = file_config.search.profile_site {
        config.profile_site = site.trim().to_string();
    }
    if let Some(enable) = file_config.search.enable_direct_search {
        config.enable_direct_search = enable;
    }
    if let Some(enable) = file_config.search.enable_profile_search {
        config.enable_profile_search = enable;
    }

    // Discovery
    if let Some(probe_all) = file_config.discovery.probe_all_site_pages {
        config.probe_all_site_pages = probe_all;
    }

    // Enrichment API
    if let Some(ref key) = file_config.enrichment_api.hunter_api_key {
        config.hunter_api_key = Some(key.clone());
    }
    if let Some(ref url) = file_config.enrichment_api.hunter_api_url {
        config.hunter_api_url = url.trim().to_string();
    }

    // Aliases extend the built-in table; later layers win on conflicts.
    for (vanity, corporate) in &file_config.domain_aliases {
        config
            .domain_aliases
            .insert(vanity.clone(), corporate.clone());
    }
}
