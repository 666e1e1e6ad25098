use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static e-mail pattern compiles")
    })
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Validates an already-normalized address.
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Sorted, deduplicated set of normalized e-mail addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmailSet(BTreeSet<String>);

impl EmailSet {
    /// Normalizes every candidate and silently drops the ones that do not look like e-mails.
    pub fn from_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = candidates
            .into_iter()
            .map(|candidate| normalize_email(candidate.as_ref()))
            .filter(|email| !email.is_empty() && is_valid_email(email))
            .collect();
        Self(emails)
    }

    /// Parses the comma separated teammate list stored on an application.
    pub fn parse_team_members(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self::from_candidates(value.split(',')),
            _ => Self::default(),
        }
    }

    pub fn insert(&mut self, email: &str) {
        let email = normalize_email(email);
        if !email.is_empty() && is_valid_email(&email) {
            self.0.insert(email);
        }
    }

    pub fn is_subset(&self, other: &EmailSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Canonical key used for synthetic team ids; `|` keeps it out of CSV delimiters.
    pub fn key(&self) -> String {
        self.join("|")
    }

    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn rejects_addresses_without_domain_dot() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn parses_teammate_list_sorted_and_deduplicated() {
        let set = EmailSet::parse_team_members(Some(
            " Zed@uni.ca, amy@uni.ca,,not-an-email, zed@uni.ca ",
        ));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["amy@uni.ca", "zed@uni.ca"]);
        assert_eq!(set.key(), "amy@uni.ca|zed@uni.ca");
    }

    #[test]
    fn blank_teammate_list_is_empty() {
        assert!(EmailSet::parse_team_members(None).is_empty());
        assert!(EmailSet::parse_team_members(Some("   ")).is_empty());
    }
}
