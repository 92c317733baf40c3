//! Runtime configuration for the enricher.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! explicit overrides from [`ConfigBuilder`], then validation.

mod builder;
mod loading;
mod validation;

pub use builder::ConfigBuilder;

pub(crate) use crate::core::error::Result;

use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Vanity web domains whose employees use a different mail domain.
pub(crate) const DEFAULT_DOMAIN_ALIASES: &[(&str, &str)] = &[
    ("becn.com", "beaconroofingsupply.com"),
    ("bunzldistribution.com", "bunzlusa.com"),
];

/// Effective configuration used by the enricher and its sources.
#[derive(Debug, Clone)]
pub struct Config {
    /// Timeout for search result pages, search queries and the enrichment API.
    pub request_timeout: Duration,
    /// Timeout for probing a company's own site during pattern discovery.
    pub site_probe_timeout: Duration,
    pub user_agent: String,
    /// Random delay range (seconds) applied before each live search query.
    pub sleep_between_searches: (f32, f32),

    pub search_url: String,
    /// Result URLs requested per prober query.
    pub search_results_per_query: usize,
    /// Result URLs requested by the `"@domain"` discovery search.
    pub discovery_search_results: usize,
    /// Result URLs containing any of these are never fetched.
    pub skipped_result_domains: Vec<String>,
    /// Site restriction used by the profile-network prober.
    pub profile_site: String,
    pub enable_direct_search: bool,
    pub enable_profile_search: bool,

    /// Keep probing reachable site pages until one yields addresses, instead of
    /// stopping at the first reachable page.
    pub probe_all_site_pages: bool,

    pub hunter_api_key: Option<String>,
    pub hunter_api_url: String,

    pub domain_aliases: HashMap<String, String>,

    pub loaded_config_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(8),
            site_probe_timeout: Duration::from_secs(6),
            user_agent: "Mozilla/5.0".to_string(),
            sleep_between_searches: (0.5, 1.5),
            search_url: "https://www.google.com/search".to_string(),
            search_results_per_query: 8,
            discovery_search_results: 6,
            skipped_result_domains: vec!["facebook.com".to_string()],
            profile_site: "linkedin.com/in".to_string(),
            enable_direct_search: true,
            enable_profile_search: true,
            probe_all_site_pages: false,
            hunter_api_key: None,
            hunter_api_url: "https://api.hunter.io/v2/domain-search".to_string(),
            domain_aliases: DEFAULT_DOMAIN_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            loaded_config_path: None,
        }
    }
}

/// Mirror of [`Config`] as it appears in a TOML file. Every field is optional.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub enrichment_api: EnrichmentApiConfig,
    #[serde(default)]
    pub domain_aliases: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout: Option<u64>,
    pub site_probe_timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub min_sleep: Option<f32>,
    pub max_sleep: Option<f32>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct SearchConfig {
    pub search_url: Option<String>,
    pub results_per_query: Option<usize>,
    pub discovery_results: Option<usize>,
    pub skipped_domains: Option<Vec<String>>,
    pub profile_site: Option<String>,
    pub enable_direct_search: Option<bool>,
    pub enable_profile_search: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DiscoveryConfig {
    pub probe_all_site_pages: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct EnrichmentApiConfig {
    pub hunter_api_key: Option<String>,
    pub hunter_api_url: Option<String>,
}

/// Picks a random delay within the configured search sleep range.
pub(crate) fn get_random_sleep_duration(config: &Config) -> Duration {
    let (min, max) = config.sleep_between_searches;
    if !min.is_finite() || !max.is_finite() || max <= 0.0 {
        return Duration::ZERO;
    }
    let secs = if max > min {
        rand::thread_rng().gen_range(min..=max)
    } else {
        min
    };
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::ZERO)
}
