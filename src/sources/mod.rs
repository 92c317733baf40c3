//! Network collaborators used by the discovery cascade.
//!
//! Each collaborator is a trait so the enricher can be driven by the live
//! HTTP implementations or by in-memory fakes.

pub mod fetch;
pub mod hunter;
pub mod search;

use crate::core::config::Config;
use crate::core::error::Result;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use fetch::HttpFetcher;
pub use hunter::HunterClient;
pub use search::GoogleSearch;

/// A web search returning result URLs in rank order.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>>;
}

/// Response of a page fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Plain HTTP GET of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage>;
}

/// Paid enrichment lookup returning a domain's address pattern, if known.
#[async_trait]
pub trait EnrichmentApi: Send + Sync {
    async fn domain_pattern(&self, domain: &str) -> Result<Option<String>>;
}

/// The set of collaborators the enricher talks to.
#[derive(Clone)]
pub struct Sources {
    pub search: Arc<dyn SearchEngine>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub enrichment_api: Option<Arc<dyn EnrichmentApi>>,
}

impl Sources {
    /// Builds the live HTTP-backed sources. The enrichment API is only wired in
    /// when an API key is configured.
    pub fn live(config: &Arc<Config>) -> Result<Self> {
        let client = fetch::build_http_client(config)?;
        let enrichment_api = config.hunter_api_key.as_ref().map(|key| {
            Arc::new(HunterClient::new(
                client.clone(),
                config.hunter_api_url.clone(),
                key.clone(),
                config.request_timeout,
            )) as Arc<dyn EnrichmentApi>
        });
        Ok(Self {
            search: Arc::new(GoogleSearch::new(client.clone(), Arc::clone(config))),
            fetcher: Arc::new(HttpFetcher::new(client)),
            enrichment_api,
        })
    }

    /// Fetches a page and returns its body when the status is a success.
    /// Failures are logged here and reported as `None`.
    pub(crate) async fn fetch_ok(&self, url: &str, timeout: Duration) -> Option<String> {
        match self.fetcher.fetch(url, timeout).await {
            Ok(page) if page.is_success() => Some(page.body),
            Ok(page) => {
                tracing::debug!(target: "fetch_task", "Skipping {} (status {})", url, page.status);
                None
            }
            Err(e) => {
                tracing::debug!(target: "fetch_task", "Fetch failed for {}: {}", url, e);
                None
            }
        }
    }

    /// Runs a search and treats any failure as an empty result list.
    pub(crate) async fn search_or_empty(&self, query: &str, max_results: usize) -> Vec<String> {
        match self.search.search(query, max_results).await {
            Ok(results) => {
                tracing::debug!(target: "search_task", "Query {} returned {} results", query, results.len());
                results
            }
            Err(e) => {
                tracing::warn!(target: "search_task", "Search failed for {}: {}", query, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators for unit tests.

    use super::*;
    use crate::core::error::AppError;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeSearch {
        pub results: HashMap<String, Vec<String>>,
        pub queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        pub fn with(mut self, query: &str, urls: &[&str]) -> Self {
            self.results
                .insert(query.to_string(), urls.iter().map(|u| u.to_string()).collect());
            self
        }
    }

    #[async_trait]
    impl SearchEngine for FakeSearch {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
            self.queries.lock().push(query.to_string());
            match self.results.get(query) {
                Some(urls) => Ok(urls.iter().take(max_results).cloned().collect()),
                None => Err(AppError::SearchBlocked(format!("no canned results for {}", query))),
            }
        }
    }

    #[derive(Default)]
    pub struct FakeFetcher {
        pub pages: HashMap<String, FetchedPage>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage> {
            self.requests.lock().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| AppError::HttpStatus {
                status: 0,
                url: url.to_string(),
            })
        }
    }

    pub struct FakeApi {
        pub pattern: Option<String>,
        pub calls: Mutex<usize>,
    }

    #[async_trait]
    impl EnrichmentApi for FakeApi {
        async fn domain_pattern(&self, _domain: &str) -> Result<Option<String>> {
            *self.calls.lock() += 1;
            Ok(self.pattern.clone())
        }
    }

    pub fn sources(search: Arc<FakeSearch>, fetcher: Arc<FakeFetcher>) -> Sources {
        Sources {
            search,
            fetcher,
            enrichment_api: None,
        }
    }
}
