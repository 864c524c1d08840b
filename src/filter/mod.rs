//! Domain filtering for zones handed to the provider.
//!
//! The controller passes either plain inclusion/exclusion lists or a regex
//! pair. Zones failing the filter are simply skipped, never an error.

use regex::Regex;

/// Matches zone/domain names against the configured filter expressions.
///
/// List filters use DNS suffix semantics: `example.com` matches itself and
/// any name below it. An empty inclusion list matches everything. Exclusions
/// always win over inclusions.
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    regex_include: Option<Regex>,
    regex_exclude: Option<Regex>,
}

impl DomainFilter {
    /// Build a filter from literal inclusion and exclusion lists.
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        DomainFilter {
            include: include.into_iter().map(|d| normalize(&d)).collect(),
            exclude: exclude.into_iter().map(|d| normalize(&d)).collect(),
            ..Default::default()
        }
    }

    /// Build a filter from an inclusion regex and an optional exclusion regex.
    pub fn regex(include: Regex, exclude: Option<Regex>) -> Self {
        DomainFilter {
            regex_include: Some(include),
            regex_exclude: exclude,
            ..Default::default()
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = normalize(name);

        if let Some(include) = &self.regex_include {
            if let Some(exclude) = &self.regex_exclude {
                if exclude.is_match(&name) {
                    return false;
                }
            }
            return include.is_match(&name);
        }

        if self.exclude.iter().any(|d| suffix_match(&name, d)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|d| suffix_match(&name, d))
    }
}

// Domain names compare case-insensitively and with or without a trailing dot
fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

fn suffix_match(name: &str, domain: &str) -> bool {
    name == domain || name.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_everything_without_filters() {
        let filter = DomainFilter::default();
        assert!(filter.matches("a.com"));
        assert!(filter.matches("anything.example.org"));
    }

    #[test]
    fn should_match_included_domains_only() {
        let filter = DomainFilter::new(vec!["a.com".to_string()], vec![]);
        assert!(filter.matches("a.com"));
        assert!(filter.matches("sub.a.com"));
        assert!(!filter.matches("b.com"));
        assert!(!filter.matches("nota.com"));
    }

    #[test]
    fn should_respect_exclusions() {
        let filter = DomainFilter::new(
            vec!["a.com".to_string()],
            vec!["internal.a.com".to_string()],
        );
        assert!(filter.matches("a.com"));
        assert!(!filter.matches("internal.a.com"));
        assert!(!filter.matches("zone.internal.a.com"));
    }

    #[test]
    fn should_normalize_case_and_trailing_dots() {
        let filter = DomainFilter::new(vec!["A.com.".to_string()], vec![]);
        assert!(filter.matches("a.COM"));
        assert!(filter.matches("sub.a.com."));
    }

    #[test]
    fn should_match_regex_filters() {
        let filter = DomainFilter::regex(
            Regex::new(r"\.example\.com$").unwrap(),
            Some(Regex::new(r"^excluded\.").unwrap()),
        );
        assert!(filter.matches("zone.example.com"));
        assert!(!filter.matches("excluded.example.com"));
        assert!(!filter.matches("example.org"));
    }
}
