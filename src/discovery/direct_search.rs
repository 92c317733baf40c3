//! Finds a ready-made address for a person by searching the open web.

use crate::core::config::Config;
use crate::sources::Sources;
use crate::utils::extract::extract_emails;
use crate::utils::patterns::clean_name;

/// Search queries in priority order: company-scoped first, then name-only.
fn build_queries(first: &str, last: &str, company: Option<&str>) -> Vec<String> {
    let base = format!("{} {}", first, last);
    let mut queries = Vec::with_capacity(4);
    if let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) {
        queries.push(format!("\"{}\" \"{}\" email", base, company));
        queries.push(format!("\"{}\" \"{}\" \"@\"", base, company));
    }
    queries.push(format!("\"{}\" email", base));
    queries.push(format!("\"{}\" \"@\"", base));
    queries
}

/// Picks the address to return from one page's tokens: the first containing the
/// cleaned last name, else the first token.
fn pick_email(emails: &[String], last: &str) -> Option<String> {
    let clean_last = clean_name(last);
    emails
        .iter()
        .find(|e| !clean_last.is_empty() && e.to_lowercase().contains(&clean_last))
        .or_else(|| emails.first())
        .map(|e| e.to_lowercase())
}

/// Runs the name/company queries and returns the first address found.
pub(crate) async fn find_email_via_search(
    config: &Config,
    sources: &Sources,
    first: &str,
    last: &str,
    company: Option<&str>,
) -> Option<String> {
    let task_label = format!("{} {}", first, last);
    for query in build_queries(first, last, company) {
        let results = sources
            .search_or_empty(&query, config.search_results_per_query)
            .await;

        for url in results {
            if config
                .skipped_result_domains
                .iter()
                .any(|skipped| url.contains(skipped.as_str()))
            {
                tracing::trace!(target: "search_task", "[{}] Skipping unscrapable result {}", task_label, url);
                continue;
            }
            let Some(body) = sources.fetch_ok(&url, config.request_timeout).await else {
                continue;
            };
            let emails = extract_emails(&body, None);
            if let Some(email) = pick_email(&emails, last) {
                tracing::info!(target: "search_task", "[{}] Found {} on {}", task_label, email, url);
                return Some(email);
            }
        }
    }
    None
}
