//! Provides the `ConfigBuilder` for fluent configuration construction.

use super::loading::{apply_file_config, load_config_file};
use super::validation::validate_config;
use super::{Config, ConfigFile, Result};
use crate::AppError;
use std::path::Path;
use std::time::Duration;

/// Builder pattern for creating `Config` instances fluently.
///
/// Handles loading from files, applying overrides, and validation.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
    config_file_path: Option<String>,
    overrides: ConfigFile,
}

impl ConfigBuilder {
    /// Creates a new builder with default configuration values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify an optional configuration file path to load.
    pub fn config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file_path = Some(path.into());
        self
    }

    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.overrides.network.request_timeout = Some(duration.as_secs());
        self
    }
    pub fn site_probe_timeout(mut self, duration: Duration) -> Self {
        self.overrides.network.site_probe_timeout = Some(duration.as_secs());
        self
    }
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.overrides.network.user_agent = Some(value.into());
        self
    }
    pub fn sleep_between_searches(mut self, min: f32, max: f32) -> Self {
        self.overrides.network.min_sleep = Some(min);
        self.overrides.network.max_sleep = Some(max);
        self
    }
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.overrides.search.search_url = Some(url.into());
        self
    }
    pub fn search_results_per_query(mut self, value: usize) -> Self {
        self.overrides.search.results_per_query = Some(value);
        self
    }
    pub fn discovery_search_results(mut self, value: usize) -> Self {
        self.overrides.search.discovery_results = Some(value);
        self
    }
    pub fn skipped_result_domains(mut self, domains: Vec<String>) -> Self {
        self.overrides.search.skipped_domains = Some(domains);
        self
    }
    pub fn profile_site(mut self, site: impl Into<String>) -> Self {
        self.overrides.search.profile_site = Some(site.into());
        self
    }
    pub fn enable_direct_search(mut self, enable: bool) -> Self {
        self.overrides.search.enable_direct_search = Some(enable);
        self
    }
    pub fn enable_profile_search(mut self, enable: bool) -> Self {
        self.overrides.search.enable_profile_search = Some(enable);
        self
    }
    pub fn probe_all_site_pages(mut self, enable: bool) -> Self {
        self.overrides.discovery.probe_all_site_pages = Some(enable);
        self
    }
    pub fn hunter_api_key(mut self, key: Option<impl Into<String>>) -> Self {
        self.overrides.enrichment_api.hunter_api_key = key.map(|k| k.into());
        self
    }
    pub fn hunter_api_url(mut self, url: impl Into<String>) -> Self {
        self.overrides.enrichment_api.hunter_api_url = Some(url.into());
        self
    }
    /// Adds a vanity-domain alias on top of the built-in table.
    pub fn domain_alias(mut self, vanity: impl Into<String>, corporate: impl Into<String>) -> Self {
        self.overrides
            .domain_aliases
            .insert(vanity.into(), corporate.into());
        self
    }

    /// Builds the final `Config` object, applying defaults, file settings, overrides, and validation.
    pub fn build(mut self) -> Result<Config> {
        let mut loaded_path: Option<String> = None;

        if let Some(ref path) = self.config_file_path {
            match load_config_file(path) {
                Ok(file_config) => {
                    apply_file_config(&mut self.config, &file_config);
                    loaded_path = Some(path.clone());
                    tracing::info!("Loaded base configuration from specified file: {}", path);
                }
                Err(e) => {
                    tracing::error!("Failed to load specified config file '{}': {}", path, e);
                    return Err(AppError::Config(format!(
                        "Failed to load specified configuration file '{}': {}",
                        path, e
                    )));
                }
            }
        } else {
            for path_str in ["./email-enricher.toml", "./config.toml"] {
                if !Path::new(path_str).exists() {
                    continue;
                }
                match load_config_file(path_str) {
                    Ok(file_config) => {
                        apply_file_config(&mut self.config, &file_config);
                        loaded_path = Some(path_str.to_string());
                        tracing::info!(
                            "Loaded base configuration from default location: {}",
                            path_str
                        );
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load or parse default config '{}': {}",
                            path_str,
                            e
                        );
                    }
                }
            }
            if loaded_path.is_none() {
                tracing::debug!("No configuration file found. Using default values and overrides.");
            }
        }

        apply_file_config(&mut self.config, &self.overrides);
        self.config.loaded_config_path = loaded_path;
        validate_config(&mut self.config)?;

        tracing::debug!("Final configuration built successfully.");
        Ok(self.config)
    }
}
