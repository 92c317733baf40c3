//! Utility functions for turning website strings into canonical domains.

use std::collections::HashMap;
use url::Url;

/// Extracts the lowercase host (without a leading `www.`) from a website string.
///
/// Handles common variations:
/// - Adds `http://` if no scheme is present.
/// - Parses the URL and takes its host.
/// - Falls back to the raw input when it does not parse but looks like a bare domain.
/// - Removes a leading `www.` and lowercases.
///
/// Returns `None` for absent, empty or unparseable input.
pub fn normalize_domain(website: Option<&str>) -> Option<String> {
    let trimmed_input = website?.trim();
    if trimmed_input.is_empty() {
        return None;
    }

    let url_str_with_scheme = if !trimmed_input.contains("://") {
        format!("http://{}", trimmed_input)
    } else {
        trimmed_input.to_string()
    };

    let host = match Url::parse(&url_str_with_scheme) {
        Ok(url) => url.host_str().unwrap_or_default().to_string(),
        Err(e) => {
            tracing::debug!(
                "Failed to parse '{}' as URL (original: '{}'): {}",
                url_str_with_scheme,
                trimmed_input,
                e
            );
            String::new()
        }
    };

    let host = if host.is_empty() {
        // Fall back to the path-like input when it looks like a bare domain.
        let candidate = trimmed_input.split('/').next().unwrap_or_default();
        if candidate.contains('.') && !candidate.contains(' ') && !candidate.contains(':') {
            candidate.to_string()
        } else {
            tracing::warn!("Could not extract a domain from '{}'", trimmed_input);
            return None;
        }
    } else {
        host
    };

    let lowered = host.to_lowercase();
    let domain = lowered.strip_prefix("www.").unwrap_or(&lowered);
    if domain.is_empty() {
        return None;
    }
    Some(domain.to_string())
}

/// Replaces a vanity domain with its corporate mail domain (exact match).
pub fn resolve_alias(domain: &str, aliases: &HashMap<String, String>) -> String {
    match aliases.get(domain) {
        Some(corporate) => {
            tracing::debug!("Domain alias applied: {} -> {}", domain, corporate);
            corporate.clone()
        }
        None => domain.to_string(),
    }
}

/// Normalizes a website and applies the alias table in one step.
pub fn canonical_domain(
    website: Option<&str>,
    aliases: &HashMap<String, String>,
) -> Option<String> {
    normalize_domain(website).map(|d| resolve_alias(&d, aliases))
}

/// Host part of an address (everything after the last `@`), lowercased.
pub(crate) fn email_host(email: &str) -> String {
    email.rsplit('@').next().unwrap_or_default().to_lowercase()
}

/// Local part of an address (everything before the first `@`).
pub(crate) fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}
