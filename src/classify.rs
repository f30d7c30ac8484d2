//! Entry classification by `objectClass`.
//!
//! Classification is a forward fold over an entry's lines. The running type
//! starts as [`EntryType::Unknown`] and each matching `objectClass` line
//! overwrites it, so the last matching line wins. A `uid` line only yields a
//! user node if a user `objectClass` came before it, and a `cn` line only
//! yields a group node if a group `objectClass` came before it. Exports that
//! list `objectClass` after the naming attribute therefore produce no node
//! for that entry.
use crate::entry::DirectoryEntry;
use crate::graph::{Node, NodeKind};

pub const OBJECT_CLASS: &str = "objectClass";
pub const UID: &str = "uid";
pub const CN: &str = "cn";

const USER_CLASSES: [&str; 2] = ["inetOrgPerson", "posixAccount"];
const GROUP_CLASSES: [&str; 3] = ["groupOfNames", "posixGroup", "groupOfMembers"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryType {
    User,
    Group,
    #[default]
    Unknown,
}

impl EntryType {
    fn from_object_class(value: &str) -> Option<Self> {
        if USER_CLASSES.iter().any(|c| value.contains(c)) {
            Some(EntryType::User)
        } else if GROUP_CLASSES.iter().any(|c| value.contains(c)) {
            Some(EntryType::Group)
        } else {
            None
        }
    }
}

/// Outcome of classifying one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Type after the last line of the entry.
    pub entry_type: EntryType,
    /// Nodes emitted during the scan, in document order.
    pub nodes: Vec<Node>,
}

pub fn classify(entry: &DirectoryEntry<'_>) -> Classification {
    entry
        .lines
        .iter()
        .fold(Classification::default(), |mut acc, line| {
            match line.name {
                Some(OBJECT_CLASS) => {
                    if let Some(t) = EntryType::from_object_class(line.value) {
                        acc.entry_type = t;
                    }
                }
                Some(UID) if acc.entry_type == EntryType::User => {
                    acc.nodes.push(Node::new(entry.dn, line.value, NodeKind::User));
                }
                Some(CN) if acc.entry_type == EntryType::Group => {
                    acc.nodes.push(Node::new(entry.dn, line.value, NodeKind::Group));
                }
                _ => {}
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::entries;

    fn classify_text(text: &str) -> Classification {
        classify(&entries(text).next().unwrap())
    }

    #[test]
    fn user_entry_yields_uid_node() {
        let c = classify_text(
            "dn: uid=alice,ou=people,dc=x\nobjectClass: inetOrgPerson\nuid: alice\n",
        );
        assert_eq!(c.entry_type, EntryType::User);
        assert_eq!(
            c.nodes,
            vec![Node::new("uid=alice,ou=people,dc=x", "alice", NodeKind::User)]
        );
    }

    #[test]
    fn group_entry_yields_cn_node() {
        let c = classify_text("dn: cn=admins\nobjectClass: top\nobjectClass: posixGroup\ncn: admins\n");
        assert_eq!(c.entry_type, EntryType::Group);
        assert_eq!(c.nodes, vec![Node::new("cn=admins", "admins", NodeKind::Group)]);
    }

    #[test]
    fn label_before_object_class_yields_nothing() {
        let c = classify_text("dn: uid=bob\nuid: bob\nobjectClass: posixAccount\n");
        assert_eq!(c.entry_type, EntryType::User);
        assert!(c.nodes.is_empty());
    }

    #[test]
    fn last_matching_object_class_wins() {
        let c = classify_text(
            "dn: cn=odd\nobjectClass: inetOrgPerson\nobjectClass: groupOfNames\nuid: odd\ncn: odd\n",
        );
        assert_eq!(c.entry_type, EntryType::Group);
        assert_eq!(c.nodes, vec![Node::new("cn=odd", "odd", NodeKind::Group)]);
    }

    #[test]
    fn non_matching_object_class_keeps_previous_type() {
        let c = classify_text("dn: uid=c\nobjectClass: posixAccount\nobjectClass: top\nuid: c\n");
        assert_eq!(c.entry_type, EntryType::User);
        assert_eq!(c.nodes.len(), 1);
    }

    #[test]
    fn unknown_entry_yields_nothing() {
        let c = classify_text("dn: ou=people\nobjectClass: organizationalUnit\ncn: people\n");
        assert_eq!(c.entry_type, EntryType::Unknown);
        assert!(c.nodes.is_empty());
    }
}
