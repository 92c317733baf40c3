//! Email-shaped token extraction from HTML and text.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

/// Returns every email-shaped token in `text`, in order of appearance.
///
/// No deduplication or case folding is applied. When `domain` is given, only
/// tokens ending in `@{domain}` (ASCII case-insensitive) are kept.
pub fn extract_emails(text: &str, domain: Option<&str>) -> Vec<String> {
    let suffix = domain
        .filter(|d| !d.is_empty())
        .map(|d| format!("@{}", d.to_ascii_lowercase()));

    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| match suffix {
            Some(ref s) => token.to_ascii_lowercase().ends_with(s.as_str()),
            None => true,
        })
        .map(str::to_string)
        .collect()
}
