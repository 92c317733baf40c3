//! Looks for an address on the person's public professional-network profile.

use crate::core::config::Config;
use crate::sources::Sources;
use crate::utils::extract::extract_emails;

fn build_query(first: &str, last: &str, company: Option<&str>, profile_site: &str) -> String {
    let mut parts = vec![format!("\"{}\"", first), format!("\"{}\"", last)];
    if let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(format!("\"{}\"", company));
    }
    parts.push(format!("site:{}", profile_site));
    parts.push("email".to_string());
    parts.join(" ")
}

/// Addresses on a profile page: those at `domain` first, otherwise (when a
/// domain is known) any address containing the last name.
fn profile_emails(body: &str, last: &str, domain: Option<&str>) -> Vec<String> {
    let emails = extract_emails(body, domain);
    if !emails.is_empty() || domain.is_none() {
        return emails;
    }
    let last_lower = last.to_lowercase();
    extract_emails(body, None)
        .into_iter()
        .filter(|e| e.to_lowercase().contains(&last_lower))
        .collect()
}

/// Searches profile pages for the person and returns the first usable address.
pub(crate) async fn find_email_via_profile(
    config: &Config,
    sources: &Sources,
    first: &str,
    last: &str,
    company: Option<&str>,
    domain: Option<&str>,
) -> Option<String> {
    let query = build_query(first, last, company, &config.profile_site);
    let results = sources
        .search_or_empty(&query, config.search_results_per_query)
        .await;

    for url in results
        .iter()
        .filter(|u| u.contains(config.profile_site.as_str()))
    {
        let Some(body) = sources.fetch_ok(url, config.request_timeout).await else {
            continue;
        };
        if let Some(email) = profile_emails(&body, last, domain).first() {
            tracing::info!(target: "search_task", "[{} {}] Found {} on profile {}", first, last, email, url);
            return Some(email.to_lowercase());
        }
    }
    None
}
