//! The set of users allowed to issue commands.

use std::collections::BTreeSet;

/// Case-insensitive set of authorized user names.
///
/// Names are folded to lowercase once, on construction. Player names are
/// ASCII, so lookups compare with `eq_ignore_ascii_case` instead of
/// allocating a folded copy of the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedUsers {
    users: BTreeSet<String>,
}

impl AllowedUsers {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let users = users
            .into_iter()
            .map(|u| u.as_ref().trim().to_lowercase())
            .filter(|u| !u.is_empty())
            .collect();
        Self { users }
    }

    /// Parse a comma-separated list, e.g. from an environment variable.
    pub fn from_csv(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.eq_ignore_ascii_case(username))
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_membership() {
        let allowed = AllowedUsers::new(["Sav4da"]);
        assert!(allowed.contains("sav4da"));
        assert!(allowed.contains("SAV4DA"));
        assert!(!allowed.contains("random"));
    }

    #[test]
    fn test_from_csv_skips_blanks() {
        let allowed = AllowedUsers::from_csv(" alice, ,Bob,");
        assert_eq!(allowed.len(), 2);
        assert_eq!(allowed.iter().collect::<Vec<_>>(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_empty_allows_nobody() {
        let allowed = AllowedUsers::default();
        assert!(allowed.is_empty());
        assert!(!allowed.contains(""));
    }
}
