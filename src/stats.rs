//! Statistical summaries over a parsed graph.
use std::collections::HashMap;

use crate::graph::{Graph, NodeKind};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub users: usize,
    pub groups: usize,
    pub edges: usize,
    pub unresolved: usize,
    /// Distinct edge targets, i.e. entries with at least one resolved member.
    pub populated_groups: usize,
}

pub fn calculate_statistics(graph: &Graph) -> GraphStats {
    let users = graph
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::User)
        .count();
    let mut targets: Vec<&str> = graph.edges.iter().map(|e| e.target.as_str()).collect();
    targets.sort_unstable();
    targets.dedup();
    GraphStats {
        users,
        groups: graph.nodes.len() - users,
        edges: graph.edges.len(),
        unresolved: graph.unresolved,
        populated_groups: targets.len(),
    }
}

/// Return the top-N edge targets by member count as (label, count), sorted by
/// count descending then label ascending. Targets that are not nodes are
/// labelled by their DN.
pub fn largest_groups(graph: &Graph, top_n: usize) -> Vec<(String, usize)> {
    use std::cmp::Reverse;
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for e in &graph.edges {
        *freq.entry(e.target.as_str()).or_insert(0) += 1;
    }
    let mut items: Vec<(String, usize)> = freq
        .into_iter()
        .map(|(dn, count)| {
            let label = graph.node(dn).map_or(dn, |n| n.label.as_str());
            (label.to_string(), count)
        })
        .collect();
    items.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
    items.truncate(top_n);
    items
}
