//! The configurable list of attribute names treated as membership references.
use std::fmt;

/// Attributes used until the caller configures something else.
pub const DEFAULT_MEMBERSHIP_ATTRIBUTES: [&str; 2] = ["member", "memberUid"];

/// Ordered list of membership attribute names. Duplicates are allowed and an
/// empty list is valid (it resolves no edges).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipAttributes(Vec<String>);

impl Default for MembershipAttributes {
    fn default() -> Self {
        Self::new(DEFAULT_MEMBERSHIP_ATTRIBUTES)
    }
}

impl MembershipAttributes {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list such as `member, memberUid`. Names are
    /// trimmed and empty items are skipped.
    pub fn parse_list(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|a| a == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MembershipAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_skips_empty() {
        let a = MembershipAttributes::parse_list(" member ,, memberUid,");
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["member", "memberUid"]);
        assert!(MembershipAttributes::parse_list(" , ").is_empty());
    }

    #[test]
    fn default_and_display() {
        let a = MembershipAttributes::default();
        assert!(a.contains("memberUid"));
        assert!(!a.contains("memberOf"));
        assert_eq!(a.to_string(), "member, memberUid");
    }
}
