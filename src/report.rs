//! Human-readable rendering for terminal output.
//!
//! Produces the colored parse summary (counts and the largest groups) plus the
//! listings behind the console's `view_*` commands and the detection report
//! shown after a document is loaded.
use colored::*;

use crate::{
    attributes::MembershipAttributes,
    detect::GroupPreview,
    entry::DirectoryEntry,
    graph::{Edge, Graph, Node},
    stats::{calculate_statistics, largest_groups},
};

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

pub fn render_summary(graph: &Graph) -> String {
    render_summary_with_top(graph, 10)
}

pub fn render_summary_with_top(graph: &Graph, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        "LDAPLynx: Directory Membership Graph".bold().cyan()
    ));

    let stats = calculate_statistics(graph);
    out.push_str(&section_header(
        &"Graph Statistics".bold().yellow().to_string(),
    ));
    for line in [
        format!("Nodes: {}", graph.nodes.len()),
        format!("  Users: {}", stats.users),
        format!("  Groups: {}", stats.groups),
        format!("Edges: {}", stats.edges),
        format!("Groups With Members: {}", stats.populated_groups),
        format!("Dropped References: {}", stats.unresolved),
    ] {
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&section_header(
        &"Largest Groups".bold().magenta().to_string(),
    ));
    let top = largest_groups(graph, top_n);
    if top.is_empty() {
        out.push_str("(No memberships)\n");
    } else {
        for (label, count) in top {
            out.push_str(&format!("  {}: {}\n", label, count));
        }
    }
    out
}

pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = format!("{}\n", "Nodes:".cyan());
    for n in nodes {
        out.push_str(&format!(
            "  {}\n",
            format!("{}: {} ({})", n.kind, n.label, n.dn).blue()
        ));
    }
    out
}

pub fn render_edges(edges: &[Edge]) -> String {
    let mut out = format!("{}\n", "Edges:".cyan());
    for e in edges {
        out.push_str(&format!(
            "  {}\n",
            format!("{}: {} -> {}", e.relation, e.source, e.target).blue()
        ));
    }
    out
}

/// Raw lines of one entry, `dn` line first.
pub fn render_entry(entry: &DirectoryEntry<'_>) -> String {
    let mut out = format!("{}\n", format!("Group details for {}:", entry.dn).cyan());
    out.push_str(&format!("  {}\n", format!("dn: {}", entry.dn).magenta()));
    for line in &entry.lines {
        out.push_str(&format!("  {}\n", line.raw.magenta()));
    }
    out
}

/// Report shown after loading: how many groups carry the detected attributes,
/// one example group with a few member values, and the detected names.
pub fn render_detection(previews: &[GroupPreview], detected: &MembershipAttributes) -> String {
    let mut out = format!(
        "\n{}\n",
        format!(
            "Found {} group(s) with membership attributes.",
            previews.len()
        )
        .cyan()
    );
    if let Some(group) = previews.first() {
        out.push_str(&format!("{}\n", "Example group:".cyan()));
        out.push_str(&format!("  {}\n", group.dn.magenta()));
        out.push_str(&format!(
            "  {}\n",
            format!("Members: {}", group.members.len()).magenta()
        ));
        let shown = detected.len().max(1);
        for member in group.members.iter().take(shown) {
            out.push_str(&format!(
                "  {} {}\n",
                format!("Member Example ({}):", member.attribute).magenta(),
                member.value.yellow()
            ));
        }
    }
    out.push_str(&format!(
        "\n{}\n",
        format!("Detected membership attribute(s): {}", detected).cyan()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::PreviewMember;
    use crate::entry::entries;
    use crate::graph::parse;

    const DOC: &str = "\
dn: uid=alice,ou=people,dc=x
objectClass: inetOrgPerson
uid: alice
dn: uid=bob,ou=people,dc=x
objectClass: inetOrgPerson
uid: bob
dn: cn=admins,ou=groups,dc=x
objectClass: groupOfNames
cn: admins
member: uid=alice,ou=people,dc=x
member: uid=bob,ou=people,dc=x
memberUid: ghost
dn: cn=ops,ou=groups,dc=x
objectClass: groupOfNames
cn: ops
member: uid=bob,ou=people,dc=x
";

    #[test]
    fn snapshot_summary() {
        colored::control::set_override(false);
        let g = parse(DOC, &MembershipAttributes::default());
        let s = render_summary(&g);
        insta::assert_snapshot!(s);
    }

    #[test]
    fn largest_groups_respects_limit() {
        colored::control::set_override(false);
        let g = parse(DOC, &MembershipAttributes::default());
        let s = render_summary_with_top(&g, 1);
        assert!(s.contains("admins: 2"));
        assert!(!s.contains("ops: 1"));
    }

    #[test]
    fn listings_show_every_item() {
        colored::control::set_override(false);
        let g = parse(DOC, &MembershipAttributes::default());
        let nodes = render_nodes(&g.nodes);
        assert!(nodes.contains("User: alice (uid=alice,ou=people,dc=x)"));
        assert!(nodes.contains("Group: ops (cn=ops,ou=groups,dc=x)"));
        let edges = render_edges(&g.edges);
        assert_eq!(edges.lines().count(), 4);
        assert!(edges.contains("memberOf: uid=bob,ou=people,dc=x -> cn=ops,ou=groups,dc=x"));
    }

    #[test]
    fn entry_and_detection_views() {
        colored::control::set_override(false);
        let entry = entries(DOC).nth(3).unwrap();
        let s = render_entry(&entry);
        assert!(s.contains("dn: cn=ops,ou=groups,dc=x"));
        assert!(s.contains("member: uid=bob,ou=people,dc=x"));

        let spaced = entries("dn: cn=g\ncn: g\n\nmember: uid=a\n").next().unwrap();
        assert_eq!(
            render_entry(&spaced),
            "Group details for cn=g:\n  dn: cn=g\n  cn: g\n  \n  member: uid=a\n"
        );

        let previews = vec![GroupPreview {
            dn: "cn=ops".to_string(),
            members: vec![
                PreviewMember::new("member", "a"),
                PreviewMember::new("memberUid", "b"),
                PreviewMember::new("memberUid", "c"),
            ],
        }];
        let d = render_detection(&previews, &MembershipAttributes::parse_list("member,memberUid"));
        assert!(d.contains("Found 1 group(s)"));
        assert!(d.contains("Members: 3"));
        assert!(d.contains("Member Example (member): a"));
        assert!(d.contains("Member Example (memberUid): b"));
        assert!(!d.contains(": c\n"));
        assert!(d.contains("Detected membership attribute(s): member, memberUid"));
    }
}
