//! Session state shared by the console and batch mode: the loaded document,
//! the configured membership attributes, and the last parsed graph.
//!
//! Loading a new document discards the previous graph. The membership
//! attributes survive until they are set again.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::attributes::MembershipAttributes;
use crate::detect::{GroupPreview, detect_membership_attributes, group_previews};
use crate::entry::{DirectoryEntry, find_entry};
use crate::export::{save_edges_csv, save_nodes_csv};
use crate::graph::{Edge, Graph, GraphBuilder, Node};
use crate::io::{DEFAULT_MMAP_THRESHOLD_BYTES, LoadError, read_document};
use crate::resolve::UidLookup;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no LDIF file loaded, use the 'load' command first")]
    NoDocument,
    #[error("no parsed data available, run 'parse' first")]
    NoGraph,
    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug)]
pub struct Session {
    document: Option<Document>,
    attributes: MembershipAttributes,
    uid_lookup: UidLookup,
    mmap_threshold: u64,
    graph: Option<Graph>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            document: None,
            attributes: MembershipAttributes::default(),
            uid_lookup: UidLookup::default(),
            mmap_threshold: DEFAULT_MMAP_THRESHOLD_BYTES,
            graph: None,
        }
    }

    pub fn with_uid_lookup(mut self, mode: UidLookup) -> Self {
        self.uid_lookup = mode;
        self
    }

    pub fn with_mmap_threshold(mut self, threshold_bytes: u64) -> Self {
        self.mmap_threshold = threshold_bytes;
        self
    }

    /// Read a document from disk, replacing any previous one.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<&Document, SessionError> {
        let text = read_document(&path, self.mmap_threshold)?;
        Ok(self.load_text(path, text))
    }

    /// Install already-read text as the current document.
    pub fn load_text<P: AsRef<Path>>(&mut self, path: P, text: String) -> &Document {
        self.graph = None;
        self.document.insert(Document {
            path: path.as_ref().to_path_buf(),
            text,
        })
    }

    pub fn document(&self) -> Result<&Document, SessionError> {
        self.document.as_ref().ok_or(SessionError::NoDocument)
    }

    pub fn attributes(&self) -> &MembershipAttributes {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: MembershipAttributes) {
        log::info!("membership attributes set to: {attributes}");
        self.attributes = attributes;
    }

    pub fn detect(&self) -> Result<BTreeSet<&'static str>, SessionError> {
        Ok(detect_membership_attributes(&self.document()?.text))
    }

    pub fn group_previews(
        &self,
        attributes: &MembershipAttributes,
    ) -> Result<Vec<GroupPreview>, SessionError> {
        Ok(group_previews(&self.document()?.text, attributes))
    }

    /// Rebuild the graph from the current document and attributes.
    pub fn parse(&mut self) -> Result<&Graph, SessionError> {
        let doc = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let graph = GraphBuilder::new(&self.attributes)
            .uid_lookup(self.uid_lookup)
            .build(&doc.text);
        Ok(&*self.graph.insert(graph))
    }

    pub fn graph(&self) -> Result<&Graph, SessionError> {
        self.graph.as_ref().ok_or(SessionError::NoGraph)
    }

    pub fn nodes(&self) -> Result<&[Node], SessionError> {
        Ok(&self.graph()?.nodes)
    }

    pub fn edges(&self) -> Result<&[Edge], SessionError> {
        Ok(&self.graph()?.edges)
    }

    /// Look up an entry of the current document by DN.
    pub fn entry(&self, dn: &str) -> Result<Option<DirectoryEntry<'_>>, SessionError> {
        Ok(find_entry(&self.document()?.text, dn))
    }

    pub fn export<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        nodes_path: P,
        edges_path: Q,
    ) -> Result<(), SessionError> {
        let graph = self.graph()?;
        save_nodes_csv(&graph.nodes, nodes_path).map_err(SessionError::Export)?;
        save_edges_csv(&graph.edges, edges_path).map_err(SessionError::Export)?;
        Ok(())
    }
}
