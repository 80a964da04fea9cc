//! Link resolution and the vault-wide link graph.

mod link_graph;
pub mod resolution;

pub use link_graph::{IncomingLink, LinkContext, LinkGraph, ResolvedLink};
pub use resolution::LinkResolver;
