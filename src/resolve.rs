//! Membership reference resolution.
//!
//! Values of `memberUid` are local account names and go through a
//! [`LocalIdTable`]; every other configured attribute already holds a DN.
//! The table must be complete before resolution starts so that a group can
//! reference a user declared further down the document.
use std::collections::HashMap;

use crate::attributes::MembershipAttributes;
use crate::entry::DirectoryEntry;
use crate::graph::{Edge, Node, NodeKind};

/// Attribute whose values are local identifiers rather than DNs.
pub const LOCAL_ID_ATTRIBUTE: &str = "memberUid";

/// How `memberUid` references are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UidLookup {
    /// Build the uid table from all user entries, then resolve.
    #[default]
    Prebuilt,
    /// Never populate the table; `memberUid` references are always dropped.
    /// Kept for reproducing graphs made before uid lookup existed.
    Disabled,
}

/// Map from user `uid` value to the DN of the entry declaring it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdTable {
    map: HashMap<String, String>,
}

impl LocalIdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `uid -> dn` from user nodes. A repeated uid keeps the last DN.
    pub fn from_nodes<'n>(nodes: impl IntoIterator<Item = &'n Node>) -> Self {
        let mut table = Self::new();
        table.extend_from_nodes(nodes);
        table
    }

    pub fn extend_from_nodes<'n>(&mut self, nodes: impl IntoIterator<Item = &'n Node>) {
        for node in nodes {
            if node.kind == NodeKind::User {
                self.insert(&node.label, &node.dn);
            }
        }
    }

    pub fn insert(&mut self, uid: &str, dn: &str) {
        if let Some(prev) = self.map.insert(uid.to_string(), dn.to_string()) {
            if prev != dn {
                log::debug!("uid {uid} redeclared: {prev} replaced by {dn}");
            }
        }
    }

    pub fn get(&self, uid: &str) -> Option<&str> {
        self.map.get(uid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Result of resolving one entry's membership lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub edges: Vec<Edge>,
    /// Raw values that could not be resolved.
    pub unresolved: Vec<String>,
}

pub struct MembershipResolver<'c> {
    attributes: &'c MembershipAttributes,
    table: &'c LocalIdTable,
}

impl<'c> MembershipResolver<'c> {
    pub fn new(attributes: &'c MembershipAttributes, table: &'c LocalIdTable) -> Self {
        Self { attributes, table }
    }

    /// Resolve every membership line of `entry` into an edge pointing at the
    /// entry itself. Each matching line yields at most one edge.
    pub fn resolve(&self, entry: &DirectoryEntry<'_>) -> Resolution {
        let mut out = Resolution::default();
        for line in &entry.lines {
            let Some(name) = line.name else { continue };
            if !self.attributes.contains(name) {
                continue;
            }
            let resolved = if name == LOCAL_ID_ATTRIBUTE {
                self.table.get(line.value)
            } else {
                Some(line.value)
            };
            match resolved {
                Some(member) if !member.is_empty() => {
                    out.edges.push(Edge::member_of(member, entry.dn));
                }
                _ => {
                    log::debug!(
                        "dropping unresolved {name} reference {:?} in {}",
                        line.value,
                        entry.dn
                    );
                    out.unresolved.push(line.value.to_string());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::entries;

    const GROUP: &str = "dn: cn=admins,ou=groups,dc=x\nobjectClass: posixGroup\ncn: admins\nmember: uid=alice,ou=people,dc=x\nmemberUid: bob\nmemberUid: ghost\nmemberOf: cn=all,ou=groups,dc=x\n";

    fn table() -> LocalIdTable {
        let mut t = LocalIdTable::new();
        t.insert("bob", "uid=bob,ou=people,dc=x");
        t
    }

    #[test]
    fn dn_attributes_resolve_directly() {
        let attrs = MembershipAttributes::parse_list("member");
        let t = table();
        let entry = entries(GROUP).next().unwrap();
        let r = MembershipResolver::new(&attrs, &t).resolve(&entry);
        assert_eq!(
            r.edges,
            vec![Edge::member_of("uid=alice,ou=people,dc=x", "cn=admins,ou=groups,dc=x")]
        );
        assert!(r.unresolved.is_empty());
    }

    #[test]
    fn member_uid_goes_through_table_and_drops_unknown() {
        let attrs = MembershipAttributes::parse_list("memberUid");
        let t = table();
        let entry = entries(GROUP).next().unwrap();
        let r = MembershipResolver::new(&attrs, &t).resolve(&entry);
        assert_eq!(
            r.edges,
            vec![Edge::member_of("uid=bob,ou=people,dc=x", "cn=admins,ou=groups,dc=x")]
        );
        assert_eq!(r.unresolved, vec!["ghost"]);
    }

    #[test]
    fn relation_is_member_of_for_any_attribute() {
        let attrs = MembershipAttributes::parse_list("memberOf");
        let t = LocalIdTable::new();
        let entry = entries(GROUP).next().unwrap();
        let r = MembershipResolver::new(&attrs, &t).resolve(&entry);
        assert_eq!(r.edges.len(), 1);
        assert_eq!(r.edges[0].source, "cn=all,ou=groups,dc=x");
        assert_eq!(r.edges[0].relation, "memberOf");
    }

    #[test]
    fn duplicate_configured_names_do_not_duplicate_edges() {
        let attrs = MembershipAttributes::parse_list("member,member");
        let t = LocalIdTable::new();
        let entry = entries(GROUP).next().unwrap();
        let r = MembershipResolver::new(&attrs, &t).resolve(&entry);
        assert_eq!(r.edges.len(), 1);
    }

    #[test]
    fn empty_attribute_set_resolves_nothing() {
        let attrs = MembershipAttributes::new(Vec::<String>::new());
        let t = table();
        let entry = entries(GROUP).next().unwrap();
        let r = MembershipResolver::new(&attrs, &t).resolve(&entry);
        assert!(r.edges.is_empty());
        assert!(r.unresolved.is_empty());
    }

    #[test]
    fn empty_values_are_dropped() {
        let attrs = MembershipAttributes::parse_list("member");
        let t = LocalIdTable::new();
        let entry = entries("dn: cn=g\nmember:\n").next().unwrap();
        let r = MembershipResolver::new(&attrs, &t).resolve(&entry);
        assert!(r.edges.is_empty());
        assert_eq!(r.unresolved.len(), 1);
    }

    #[test]
    fn table_only_takes_user_nodes() {
        let nodes = [
            Node::new("uid=a,dc=x", "a", NodeKind::User),
            Node::new("cn=a,dc=x", "a-group", NodeKind::Group),
            Node::new("uid=a2,dc=x", "a", NodeKind::User),
        ];
        let t = LocalIdTable::from_nodes(&nodes);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("a"), Some("uid=a2,dc=x"));
        assert_eq!(t.get("a-group"), None);
    }
}
