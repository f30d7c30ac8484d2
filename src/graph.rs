//! Graph model and construction.
//!
//! Typical usage:
//!
//! ```
//! use ldaplynx::{attributes::MembershipAttributes, graph::GraphBuilder};
//!
//! let ldif = "dn: cn=admins,dc=x\nobjectClass: groupOfNames\ncn: admins\nmember: uid=alice,dc=x\n";
//! let graph = GraphBuilder::new(&MembershipAttributes::default()).build(ldif);
//! assert_eq!(graph.nodes.len(), 1);
//! assert_eq!(graph.edges[0].target, "cn=admins,dc=x");
//! ```
use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::attributes::MembershipAttributes;
use crate::classify::classify;
use crate::entry::{DirectoryEntry, entries};
use crate::resolve::{LocalIdTable, MembershipResolver, UidLookup};

/// Relation label carried by every edge.
pub const MEMBER_OF: &str = "memberOf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum NodeKind {
    User,
    Group,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::User => "User",
            NodeKind::Group => "Group",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user or group, identified by its DN.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct Node {
    #[serde(rename = "Id")]
    pub dn: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Type")]
    pub kind: NodeKind,
}

impl Node {
    pub fn new(dn: &str, label: &str, kind: NodeKind) -> Self {
        Self {
            dn: dn.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

/// Membership of `source` in `target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct Edge {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "Relation")]
    pub relation: String,
}

impl Edge {
    pub fn member_of(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            relation: MEMBER_OF.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// One node per DN, sorted by DN.
    pub nodes: Vec<Node>,
    /// Edges in document order; duplicates are kept.
    pub edges: Vec<Edge>,
    /// Membership references that did not resolve to a DN.
    pub unresolved: usize,
}

impl Graph {
    pub fn node(&self, dn: &str) -> Option<&Node> {
        self.nodes
            .binary_search_by(|n| n.dn.as_str().cmp(dn))
            .ok()
            .map(|i| &self.nodes[i])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Builds a [`Graph`] from document text in two passes: classify every entry
/// and collect the uid table, then resolve membership lines.
pub struct GraphBuilder<'a> {
    attributes: &'a MembershipAttributes,
    uid_lookup: UidLookup,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(attributes: &'a MembershipAttributes) -> Self {
        Self {
            attributes,
            uid_lookup: UidLookup::default(),
        }
    }

    pub fn uid_lookup(mut self, mode: UidLookup) -> Self {
        self.uid_lookup = mode;
        self
    }

    pub fn build(&self, text: &str) -> Graph {
        let all: Vec<DirectoryEntry<'_>> = entries(text).collect();

        let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
        let mut table = LocalIdTable::new();
        for entry in &all {
            let emitted = classify(entry).nodes;
            // Every uid value counts, even when the node itself is later overwritten.
            if self.uid_lookup == UidLookup::Prebuilt {
                table.extend_from_nodes(&emitted);
            }
            for node in emitted {
                if let Some(prev) = nodes.get(&node.dn) {
                    if prev != &node {
                        log::debug!(
                            "node {} redefined: ({}, {}) replaced by ({}, {})",
                            node.dn,
                            prev.label,
                            prev.kind,
                            node.label,
                            node.kind
                        );
                    }
                }
                nodes.insert(node.dn.clone(), node);
            }
        }

        let resolver = MembershipResolver::new(self.attributes, &table);

        let mut edges = Vec::new();
        let mut unresolved = 0;
        for entry in &all {
            let r = resolver.resolve(entry);
            edges.extend(r.edges);
            unresolved += r.unresolved.len();
        }

        log::info!(
            "parsed {} entries into {} nodes and {} edges ({} unresolved references, {} uids)",
            all.len(),
            nodes.len(),
            edges.len(),
            unresolved,
            table.len()
        );
        Graph {
            nodes: nodes.into_values().collect(),
            edges,
            unresolved,
        }
    }
}

/// Parse `text` with the default uid lookup.
pub fn parse(text: &str, attributes: &MembershipAttributes) -> Graph {
    GraphBuilder::new(attributes).build(text)
}
