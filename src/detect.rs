//! Heuristic detection of membership attributes present in a document, and
//! the group preview listing shown before the user confirms them.
use std::collections::BTreeSet;

use crate::attributes::MembershipAttributes;
use crate::entry::{AttributeLine, entries};

/// Attribute names recognised as membership references.
pub const CANDIDATE_ATTRIBUTES: [&str; 5] =
    ["member", "memberUid", "uniqueMember", "isMemberOf", "memberOf"];

/// Return the candidates used as an attribute name on any line, sorted.
/// Names must match exactly, so `memberOf` never counts as `member`.
pub fn detect_membership_attributes(text: &str) -> BTreeSet<&'static str> {
    let mut found = BTreeSet::new();
    for line in text.lines() {
        let Some(name) = AttributeLine::parse(line).name else {
            continue;
        };
        if let Some(candidate) = CANDIDATE_ATTRIBUTES.iter().find(|c| **c == name) {
            found.insert(*candidate);
        }
    }
    log::debug!("detected membership attributes: {:?}", found);
    found
}

/// An entry carrying at least one membership attribute, with its raw member
/// values in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPreview {
    pub dn: String,
    pub members: Vec<PreviewMember>,
}

/// One membership line: the attribute it came from and its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewMember {
    pub attribute: String,
    pub value: String,
}

impl PreviewMember {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

pub fn group_previews(text: &str, attributes: &MembershipAttributes) -> Vec<GroupPreview> {
    entries(text)
        .filter_map(|entry| {
            let members: Vec<PreviewMember> = entry
                .lines
                .iter()
                .filter_map(|l| {
                    l.name
                        .filter(|n| attributes.contains(n))
                        .map(|n| PreviewMember::new(n, l.value))
                })
                .collect();
            if members.is_empty() {
                None
            } else {
                Some(GroupPreview {
                    dn: entry.dn.to_string(),
                    members,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_exact_names_only() {
        let text = "dn: cn=g\nmemberOf: cn=x\nmembers: nope\nuniqueMember: uid=a\n";
        let found: Vec<_> = detect_membership_attributes(text).into_iter().collect();
        assert_eq!(found, vec!["memberOf", "uniqueMember"]);
    }

    #[test]
    fn detects_regardless_of_entry_and_indentation() {
        let text = "  memberUid: alice\ndn: cn=g\nmember: uid=a\n";
        let found = detect_membership_attributes(text);
        assert!(found.contains("memberUid"));
        assert!(found.contains("member"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn empty_when_nothing_matches() {
        assert!(detect_membership_attributes("dn: uid=a\nuid: a\n").is_empty());
    }

    #[test]
    fn previews_list_groups_with_configured_attributes() {
        let text = "dn: uid=a\nuid: a\ndn: cn=g\ncn: g\nmember: uid=a\nmemberUid: b\n";
        let attrs = MembershipAttributes::parse_list("member,memberUid");
        let previews = group_previews(text, &attrs);
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].dn, "cn=g");
        assert_eq!(
            previews[0].members,
            vec![
                PreviewMember::new("member", "uid=a"),
                PreviewMember::new("memberUid", "b"),
            ]
        );
    }
}
