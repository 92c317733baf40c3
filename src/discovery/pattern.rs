//! Learns a company's address pattern and real mail domain from observed addresses.

use crate::core::config::Config;
use crate::core::models::{Pattern, PatternCacheEntry};
use crate::core::session::PatternCache;
use crate::sources::Sources;
use crate::utils::domain::{email_host, email_local_part};
use crate::utils::extract::extract_emails;

/// Site pages probed for addresses, in order.
fn site_probe_urls(domain: &str) -> [String; 6] {
    [
        format!("https://{}", domain),
        format!("http://{}", domain),
        format!("https://www.{}", domain),
        format!("http://www.{}", domain),
        format!("https://{}/contact", domain),
        format!("http://{}/contact", domain),
    ]
}

/// Returns `(pattern, canonical_domain)` for `domain`, consulting the cache first.
///
/// On a miss this tries the enrichment API, then the company's own site, then a
/// `"@domain"` web search. The result is cached under `domain` even when no
/// pattern was found.
pub(crate) async fn discover_pattern(
    config: &Config,
    sources: &Sources,
    cache: &mut PatternCache,
    domain: &str,
) -> PatternCacheEntry {
    if let Some(entry) = cache.get(domain) {
        tracing::debug!(target: "discovery_task", "[{}] Cache hit: {:?}", domain, entry);
        return entry.clone();
    }

    let entry = match pattern_from_api(sources, domain).await {
        Some(tag) => {
            let pattern = Pattern::from_tag(&tag);
            if pattern.is_none() {
                tracing::warn!(target: "discovery_task", "[{}] Enrichment API returned unrecognized pattern '{}'", domain, tag);
            }
            PatternCacheEntry {
                pattern,
                canonical_domain: domain.to_string(),
            }
        }
        None => {
            let mut emails = scrape_site(config, sources, domain).await;
            if emails.is_empty() {
                emails = search_for_domain(config, sources, domain).await;
            }
            infer_from_emails(domain, &emails)
        }
    };

    tracing::info!(target: "discovery_task",
        "[{}] Discovered pattern {:?}, canonical domain {}",
        domain, entry.pattern.map(|p| p.as_tag()), entry.canonical_domain
    );
    cache.insert(domain, entry).clone()
}

async fn pattern_from_api(sources: &Sources, domain: &str) -> Option<String> {
    let api = sources.enrichment_api.as_ref()?;
    match api.domain_pattern(domain).await {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!(target: "discovery_task", "[{}] Enrichment API lookup failed: {}", domain, e);
            None
        }
    }
}

/// Collects addresses (any domain) from the company's own pages.
async fn scrape_site(config: &Config, sources: &Sources, domain: &str) -> Vec<String> {
    let mut emails = Vec::new();
    for url in site_probe_urls(domain) {
        let Some(body) = sources.fetch_ok(&url, config.site_probe_timeout).await else {
            continue;
        };
        emails.extend(extract_emails(&body, None));
        tracing::debug!(target: "discovery_task", "[{}] {} yielded {} addresses", domain, url, emails.len());
        if !emails.is_empty() || !config.probe_all_site_pages {
            break;
        }
    }
    emails
}

/// Pools addresses from every page returned by a `"@domain"` search.
async fn search_for_domain(config: &Config, sources: &Sources, domain: &str) -> Vec<String> {
    let query = format!("\"@{}\"", domain);
    let mut emails = Vec::new();
    for url in sources
        .search_or_empty(&query, config.discovery_search_results)
        .await
    {
        if let Some(body) = sources.fetch_ok(&url, config.site_probe_timeout).await {
            emails.extend(extract_emails(&body, None));
        }
    }
    emails
}

/// Picks the canonical domain and pattern from a pool of scraped addresses.
///
/// The most frequent host wins, even if it is unrelated to `domain`. The pattern
/// is voted on by addresses at that host, or by all addresses if none match.
pub(crate) fn infer_from_emails(domain: &str, emails: &[String]) -> PatternCacheEntry {
    let hosts: Vec<String> = emails.iter().map(|e| email_host(e)).collect();
    let canonical_domain = most_common(&hosts).unwrap_or_else(|| domain.to_string());

    let suffix = format!("@{}", canonical_domain);
    let relevant: Vec<String> = emails
        .iter()
        .filter(|e| e.to_lowercase().ends_with(&suffix))
        .cloned()
        .collect();
    let sample = if relevant.is_empty() { emails } else { &relevant[..] };

    PatternCacheEntry {
        pattern: deduce_pattern(sample),
        canonical_domain,
    }
}

/// Shape votes cast by one local part.
///
/// A single local part can vote for several patterns: `jdoe` votes `flast`,
/// `firstl` and `firstlast`. Whether that double counting is intended is an open
/// question; the rule is kept as-is.
fn classify_local_part(local: &str) -> Vec<Pattern> {
    if local.contains('.') {
        return vec![Pattern::FirstDotLast];
    }
    let chars: Vec<char> = local.chars().collect();
    if chars.len() <= 2 || !chars[0].is_alphabetic() {
        return Vec::new();
    }

    let mut votes = Vec::with_capacity(3);
    if chars[1..].iter().all(|c| c.is_alphabetic()) {
        votes.push(Pattern::FLast);
    }
    let (head, last) = chars.split_at(chars.len() - 1);
    if last[0].is_alphabetic() && head.iter().all(|c| c.is_alphabetic()) {
        votes.push(Pattern::FirstL);
    }
    votes.push(Pattern::FirstLast);
    votes
}

/// Majority vote over local-part shapes. Ties go to the tag seen first.
pub(crate) fn deduce_pattern(emails: &[String]) -> Option<Pattern> {
    let votes: Vec<Pattern> = emails
        .iter()
        .flat_map(|e| classify_local_part(email_local_part(e)))
        .collect();
    most_common(&votes)
}

/// Most frequent element; ties resolve to the earliest first occurrence.
fn most_common<T: PartialEq + Clone>(items: &[T]) -> Option<T> {
    let mut tally: Vec<(T, usize)> = Vec::new();
    for item in items {
        match tally.iter_mut().find(|(seen, _)| seen == item) {
            Some((_, count)) => *count += 1,
            None => tally.push((item.clone(), 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (item, count) in tally {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}
