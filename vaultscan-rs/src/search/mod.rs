//! Structured search over documents.

pub mod matcher;
pub mod parser;
pub mod types;

pub use matcher::{evaluate_document, CompiledQuery};
pub use parser::parse_query;
pub use types::*;
