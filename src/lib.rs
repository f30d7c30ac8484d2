pub mod attributes;
pub mod classify;
pub mod console;
pub mod detect;
pub mod entry;
pub mod export;
pub mod graph;
pub mod io;
pub mod report;
pub mod resolve;
pub mod session;
pub mod stats;

pub mod prelude {
    pub use crate::attributes::MembershipAttributes;
    pub use crate::graph::{Edge, Graph, GraphBuilder, Node, NodeKind};
    pub use crate::session::Session;
}
