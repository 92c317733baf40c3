use async_trait::async_trait;
use email_enricher_core::{
    initialize_enricher, AppError, Config, ConfigBuilder, Contact, EmailEnricher, EmailSource,
    EnrichmentApi, EnrichmentOutcome, EnrichmentSession, FetchedPage, PageFetcher, Pattern,
    PatternCacheEntry, Result, SearchEngine, Sources,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct ScriptedSearch {
    results: HashMap<String, Vec<String>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    fn answer(mut self, query: &str, urls: &[&str]) -> Self {
        self.results
            .insert(query.to_string(), urls.iter().map(|u| u.to_string()).collect());
        self
    }
}

#[async_trait]
impl SearchEngine for ScriptedSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        self.queries.lock().push(query.to_string());
        Ok(self
            .results
            .get(query)
            .map(|urls| urls.iter().take(max_results).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct ScriptedFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage> {
        self.requests.lock().push(url.to_string());
        match self.pages.get(url) {
            Some(body) => Ok(FetchedPage {
                status: 200,
                body: body.clone(),
            }),
            None => Err(AppError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

struct CountingApi {
    patterns: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl EnrichmentApi for CountingApi {
    async fn domain_pattern(&self, domain: &str) -> Result<Option<String>> {
        self.calls.lock().push(domain.to_string());
        Ok(self.patterns.get(domain).cloned())
    }
}

fn pattern_only_config() -> Arc<Config> {
    Arc::new(
        ConfigBuilder::new()
            .enable_direct_search(false)
            .enable_profile_search(false)
            .build()
            .unwrap(),
    )
}

fn enricher(
    config: Arc<Config>,
    search: Arc<ScriptedSearch>,
    fetcher: Arc<ScriptedFetcher>,
) -> EmailEnricher {
    EmailEnricher::with_sources(
        config,
        Sources {
            search,
            fetcher,
            enrichment_api: None,
        },
    )
}

#[tokio::test]
async fn test_batch_fills_missing_emails_without_duplicates() {
    let search = Arc::new(ScriptedSearch::default());
    let fetcher = Arc::new(
        ScriptedFetcher::default().page("https://acme.com", "Write to ann.lee@acme.com or bob.ray@acme.com"),
    );
    let mut enricher = enricher(pattern_only_config(), search, fetcher.clone());

    let contacts = vec![
        Contact::new("John", "Doe", "https://www.acme.com/about"),
        Contact::new("John", "Doe", "acme.com"),
        Contact::new("Mary", "Smith", "acme.com").with_email("mary@acme.com"),
        Contact::new("", "Nobody", "acme.com"),
    ];
    let enriched = enricher.enrich_contacts(contacts).await;

    assert_eq!(enriched[0].email.as_deref(), Some("john.doe@acme.com"));
    // Pattern address is taken, so the heuristic list is walked.
    assert_eq!(enriched[1].email.as_deref(), Some("jdoe@acme.com"));
    assert_eq!(enriched[2].email.as_deref(), Some("mary@acme.com"));
    assert_eq!(enriched[3].email, None);

    let emails: Vec<&str> = enriched.iter().filter_map(|c| c.email.as_deref()).collect();
    let unique: HashSet<&str> = emails.iter().copied().collect();
    assert_eq!(unique.len(), emails.len());

    // Discovery ran once for the domain.
    assert_eq!(*fetcher.requests.lock(), vec!["https://acme.com"]);
    assert_eq!(
        enricher.session().pattern_cache.get("acme.com"),
        Some(&PatternCacheEntry {
            pattern: Some(Pattern::FirstDotLast),
            canonical_domain: "acme.com".to_string(),
        })
    );
}

#[tokio::test]
async fn test_canonical_domain_comes_from_scraped_addresses() {
    let fetcher = Arc::new(ScriptedFetcher::default().page(
        "https://acmeinc.com",
        "press: pr@acme-mail.com, jsmith@acme-mail.com, ktaylor@acme-mail.com",
    ));
    let mut enricher = enricher(
        pattern_only_config(),
        Arc::new(ScriptedSearch::default()),
        fetcher,
    );

    let mut contact = Contact::new("Alice", "Walker", "acmeinc.com");
    let outcome = enricher.enrich_contact(&mut contact).await;

    assert_eq!(
        outcome,
        EnrichmentOutcome::Filled {
            email: "awalker@acme-mail.com".to_string(),
            source: EmailSource::DiscoveredPattern,
        }
    );
}

#[tokio::test]
async fn test_enrichment_api_pattern_used_once_per_domain() {
    let api = Arc::new(CountingApi {
        patterns: HashMap::from([("initech.com".to_string(), "{first}".to_string())]),
        calls: Mutex::new(Vec::new()),
    });
    let fetcher = Arc::new(ScriptedFetcher::default());
    let sources = Sources {
        search: Arc::new(ScriptedSearch::default()),
        fetcher: fetcher.clone(),
        enrichment_api: Some(api.clone()),
    };
    let mut enricher = EmailEnricher::with_sources(pattern_only_config(), sources);

    let contacts = vec![
        Contact::new("Peter", "Gibbons", "initech.com"),
        Contact::new("Bill", "Lumbergh", "initech.com"),
    ];
    let enriched = enricher.enrich_contacts(contacts).await;

    // "{first}" is not a recognized pattern, so the heuristic list is used.
    assert_eq!(enriched[0].email.as_deref(), Some("pgibbons@initech.com"));
    assert_eq!(enriched[1].email.as_deref(), Some("blumbergh@initech.com"));
    assert_eq!(*api.calls.lock(), vec!["initech.com"]);
    assert!(fetcher.requests.lock().is_empty());
}

#[tokio::test]
async fn test_direct_search_then_profile_order() {
    let search = Arc::new(
        ScriptedSearch::default()
            .answer(
                "\"Jane\" \"Roe\" site:linkedin.com/in email",
                &["https://www.linkedin.com/in/janeroe"],
            ),
    );
    let fetcher = Arc::new(
        ScriptedFetcher::default().page("https://www.linkedin.com/in/janeroe", "jane.roe@globex.com"),
    );
    let config = Arc::new(ConfigBuilder::new().build().unwrap());
    let mut enricher = enricher(config, search.clone(), fetcher);

    let mut contact = Contact::new("Jane", "Roe", "globex.com");
    let outcome = enricher.enrich_contact(&mut contact).await;

    assert_eq!(
        outcome,
        EnrichmentOutcome::Filled {
            email: "jane.roe@globex.com".to_string(),
            source: EmailSource::ProfileNetwork,
        }
    );
    let queries = search.queries.lock();
    assert_eq!(queries[0], "\"Jane Roe\" email");
    assert_eq!(queries[1], "\"Jane Roe\" \"@\"");
    assert_eq!(queries[2], "\"Jane\" \"Roe\" site:linkedin.com/in email");
}

#[tokio::test]
async fn test_session_carries_over_between_enrichers() {
    let config = pattern_only_config();
    let mut session = EnrichmentSession::new();
    session.pattern_cache.insert(
        "acme.com",
        PatternCacheEntry {
            pattern: Some(Pattern::FirstL),
            canonical_domain: "acme.com".to_string(),
        },
    );
    session.used_emails.seed(["johnd@acme.com"]);

    let fetcher = Arc::new(ScriptedFetcher::default());
    let sources = Sources {
        search: Arc::new(ScriptedSearch::default()),
        fetcher: fetcher.clone(),
        enrichment_api: None,
    };
    let mut enricher = EmailEnricher::with_session(config, sources, session);

    let mut contact = Contact::new("John", "Doe", "acme.com");
    enricher.enrich_contact(&mut contact).await;

    assert_eq!(contact.email.as_deref(), Some("jdoe@acme.com"));
    assert!(fetcher.requests.lock().is_empty());
    let session = enricher.into_session();
    assert!(session.used_emails.contains("jdoe@acme.com"));
    assert_eq!(session.used_emails.len(), 2);
}

#[test]
fn test_initialize_enricher_starts_with_empty_session() {
    let config = Arc::new(ConfigBuilder::new().hunter_api_key(Some("k3y")).build().unwrap());
    let enricher = initialize_enricher(config.clone()).unwrap();

    assert!(enricher.session().used_emails.is_empty());
    assert!(enricher.session().pattern_cache.is_empty());
    // The live search source shares the enricher's config.
    assert_eq!(Arc::strong_count(&config), 3);
}
