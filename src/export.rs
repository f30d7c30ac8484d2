//! CSV export and import of the node and edge tables.
//!
//! - Nodes: header `Id,Label,Type`, one `"<dn>","<label>","<type>"` row per node.
//! - Edges: header `Source,Target,Relation`, one quoted row per edge.
//!
//! The header row is unquoted and every data field is quoted, which is what
//! graph tools such as Gephi import without extra settings.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use crate::graph::{Edge, Node};

pub const NODES_HEADER: &str = "Id,Label,Type";
pub const EDGES_HEADER: &str = "Source,Target,Relation";

fn write_table<'r, P, I>(path: P, header: &str, rows: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = [&'r str; 3]>,
{
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    writeln!(f, "{header}")?;
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(f);
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_nodes_csv<P: AsRef<Path>>(nodes: &[Node], path: P) -> Result<()> {
    write_table(
        path,
        NODES_HEADER,
        nodes
            .iter()
            .map(|n| [n.dn.as_str(), n.label.as_str(), n.kind.as_str()]),
    )
}

pub fn save_edges_csv<P: AsRef<Path>>(edges: &[Edge], path: P) -> Result<()> {
    write_table(
        path,
        EDGES_HEADER,
        edges
            .iter()
            .map(|e| [e.source.as_str(), e.target.as_str(), e.relation.as_str()]),
    )
}

pub fn load_nodes_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Node>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut nodes = Vec::new();
    for row in rdr.deserialize::<Node>() {
        nodes.push(row.with_context(|| format!("bad node row in {}", path.display()))?);
    }
    Ok(nodes)
}

pub fn load_edges_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Edge>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut edges = Vec::new();
    for row in rdr.deserialize::<Edge>() {
        edges.push(row.with_context(|| format!("bad edge row in {}", path.display()))?);
    }
    Ok(edges)
}
