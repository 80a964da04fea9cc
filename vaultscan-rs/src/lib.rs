//! vaultscan - syntax scanners, a task engine and a query language for
//! markdown knowledge vaults.
//!
//! # Overview
//!
//! - Code-span masking so nothing inside inline code or fences is scanned
//! - Scanners for wikilinks/embeds, tags, headings (with slugs), block
//!   anchors and `[key::value]` inline properties
//! - A configurable task engine: emoji-delimited metadata fields and
//!   indentation-based task trees
//! - A search query language (`tag:(a OR b) -path:archive property:count>=5`)
//! - A link graph with backlinks, and health checks built on it
//!
//! # Example
//!
//! ```no_run
//! use vaultscan::{CompiledQuery, Vault};
//!
//! let vault = Vault::new("/path/to/vault").unwrap();
//! let query = CompiledQuery::parse("tag:project meeting").unwrap();
//!
//! for path in vault.list_notes().unwrap() {
//!     let doc = vault.load_note(&path).unwrap();
//!     let matches = doc.evaluate(&query);
//!     if !matches.is_empty() {
//!         println!("{}: {} matches", path.display(), matches.len());
//!     }
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod health;
pub mod parser;
pub mod search;
pub mod types;
pub mod vault;

pub use config::{Config, EmojiFieldDef, EmojiValueType, TaskConfig};
pub use document::Document;
pub use error::{QueryError, Result, VaultError};
pub use graph::{IncomingLink, LinkContext, LinkGraph, LinkResolver, ResolvedLink};
pub use health::{HealthChecker, Issue, IssueType, LintSummary};
pub use search::{CompiledQuery, SearchMatch, SearchQuery, SearchResult};
pub use types::*;
pub use vault::Vault;
