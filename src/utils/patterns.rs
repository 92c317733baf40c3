//! Builds email addresses from names: the heuristic candidate list and
//! single-pattern construction.

use crate::core::models::Pattern;
use std::collections::HashSet;

/// Lowercases `name` and keeps only `a-z`. Punctuation, digits, whitespace and
/// non-ASCII letters are dropped.
///
/// `"G. Francis"` becomes `"gfrancis"`, `"O'Neil"` becomes `"oneil"`.
pub fn clean_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Generates the ordered, deduplicated list of heuristic addresses for a name.
///
/// Multi-word last names use the final token for the short forms and the full
/// concatenated surname for the long forms, so "von Schwarzenfeld" yields both
/// `jschwarzenfeld@` and `jvonschwarzenfeld@`.
pub fn generate_candidates(first_name: &str, last_name: &str, domain: &str) -> Vec<String> {
    let first = clean_name(first_name);
    let last_full = clean_name(last_name);
    let last_main = last_name
        .split_whitespace()
        .last()
        .map(clean_name)
        .unwrap_or_else(|| last_full.clone());

    let fi = initial(&first);
    let li = initial(&last_main);

    let local_parts = [
        format!("{}{}", fi, last_main),        // jdoe
        format!("{}{}", first, li),            // johnd
        format!("{}.{}", first, last_main),    // john.doe
        format!("{}{}", first, last_main),     // johndoe
        first.clone(),                         // john
        format!("{}.{}", first, last_full),    // john.vondoe
        format!("{}{}", first, last_full),     // johnvondoe
        format!("{}{}", fi, last_full),        // jvondoe
    ];

    let mut seen = HashSet::new();
    let candidates: Vec<String> = local_parts
        .iter()
        .filter(|local| !local.is_empty() && !local.starts_with('.') && !local.ends_with('.'))
        .map(|local| format!("{}@{}", local, domain).to_lowercase())
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect();

    tracing::trace!(
        "Generated {} candidates for '{} {}' @ '{}'",
        candidates.len(),
        first_name,
        last_name,
        domain
    );
    candidates
}

/// Applies one pattern to a name. Names are lowercased but otherwise used as given.
pub fn build_email_from_pattern(
    first_name: &str,
    last_name: &str,
    domain: &str,
    pattern: Pattern,
) -> String {
    let first = first_name.to_lowercase();
    let last = last_name.to_lowercase();
    match pattern {
        Pattern::FirstDotLast => format!("{}.{}@{}", first, last, domain),
        Pattern::FirstLast => format!("{}{}@{}", first, last, domain),
        Pattern::FirstL => format!("{}{}@{}", first, initial(&last), domain),
        Pattern::FLast => format!("{}{}@{}", initial(&first), last, domain),
    }
}

/// Tag-based variant of [`build_email_from_pattern`]; unknown tags produce nothing.
pub fn build_email_from_tag(
    first_name: &str,
    last_name: &str,
    domain: &str,
    tag: &str,
) -> Option<String> {
    Pattern::from_tag(tag).map(|p| build_email_from_pattern(first_name, last_name, domain, p))
}

fn initial(s: &str) -> String {
    s.chars().next().map(String::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::pattern::deduce_pattern;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("G."), "g");
        assert_eq!(clean_name("  O'Neil-Smith "), "oneilsmith");
        assert_eq!(clean_name("Barker Johns"), "barkerjohns");
        assert_eq!(clean_name("José"), "jos");
        assert_eq!(clean_name("..."), "");
    }

    #[test]
    fn test_generate_candidates_order() {
        let candidates = generate_candidates("John", "Doe", "example.com");
        assert_eq!(
            candidates,
            vec![
                "jdoe@example.com",
                "johnd@example.com",
                "john.doe@example.com",
                "johndoe@example.com",
                "john@example.com",
            ]
        );
    }

    #[test]
    fn test_generate_candidates_multi_token_last_name() {
        let candidates = generate_candidates("Jane", "von Schwarzenfeld", "acme.com");
        assert_eq!(
            candidates,
            vec![
                "jschwarzenfeld@acme.com",
                "janes@acme.com",
                "jane.schwarzenfeld@acme.com",
                "janeschwarzenfeld@acme.com",
                "jane@acme.com",
                "jane.vonschwarzenfeld@acme.com",
                "janevonschwarzenfeld@acme.com",
                "jvonschwarzenfeld@acme.com",
            ]
        );
    }

    #[test]
    fn test_generate_candidates_punctuated_first_name() {
        let candidates = generate_candidates("G.", "Francis", "acme.com");
        assert_eq!(candidates.first().map(String::as_str), Some("gfrancis@acme.com"));
        assert!(candidates.contains(&"g.francis@acme.com".to_string()));
        assert!(candidates.contains(&"g@acme.com".to_string()));
    }

    #[test]
    fn test_generate_candidates_deterministic_and_unique() {
        let names = [
            ("John", "Doe"),
            ("Test", "Test"),
            ("A", "B"),
            ("Mary Ann", "de la Cruz"),
            ("G.", "Francis"),
        ];
        for (first, last) in names {
            let a = generate_candidates(first, last, "acme.com");
            let b = generate_candidates(first, last, "acme.com");
            assert_eq!(a, b);
            let unique: HashSet<_> = a.iter().collect();
            assert_eq!(unique.len(), a.len(), "duplicates for {} {}", first, last);
        }
    }

    #[test]
    fn test_generate_candidates_unusable_first_name() {
        let candidates = generate_candidates("...", "Doe", "acme.com");
        assert!(candidates.iter().all(|c| !c.starts_with('@') && !c.starts_with('.')));
        assert_eq!(candidates.first().map(String::as_str), Some("doe@acme.com"));
    }

    #[test]
    fn test_build_email_from_pattern() {
        let d = "acme.com";
        assert_eq!(
            build_email_from_pattern("John", "Doe", d, Pattern::FirstDotLast),
            "john.doe@acme.com"
        );
        assert_eq!(
            build_email_from_pattern("John", "Doe", d, Pattern::FirstLast),
            "johndoe@acme.com"
        );
        assert_eq!(
            build_email_from_pattern("John", "Doe", d, Pattern::FirstL),
            "johnd@acme.com"
        );
        assert_eq!(
            build_email_from_pattern("John", "Doe", d, Pattern::FLast),
            "jdoe@acme.com"
        );
        assert_eq!(build_email_from_tag("John", "Doe", d, "lastfirst"), None);
        assert_eq!(
            build_email_from_tag("John", "Doe", d, "{f}{last}").as_deref(),
            Some("jdoe@acme.com")
        );
    }

    #[test]
    fn test_pattern_round_trip() {
        // A dotted local part always classifies back to first.last.
        let email = build_email_from_pattern("john", "doe", "acme.com", Pattern::FirstDotLast);
        assert_eq!(deduce_pattern(&[email]), Some(Pattern::FirstDotLast));

        let email = build_email_from_pattern("john", "doe", "acme.com", Pattern::FLast);
        assert_eq!(deduce_pattern(&[email]), Some(Pattern::FLast));

        // Undotted shapes also vote flast first, which wins the first-seen tie.
        for pattern in [Pattern::FirstLast, Pattern::FirstL] {
            let email = build_email_from_pattern("john", "doe", "acme.com", pattern);
            assert_eq!(deduce_pattern(&[email]), Some(Pattern::FLast));
        }
    }
}
