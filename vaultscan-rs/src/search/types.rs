//! Query AST and result types for vault search.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A search query AST node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchQuery {
    /// A field-level predicate (content, path, tag, etc.).
    Field(FieldPredicate),
    /// Every child must match.
    And { children: Vec<SearchQuery> },
    /// The first child that matches supplies the matches.
    Or { children: Vec<SearchQuery> },
    /// Matches when the child does not.
    Not { child: Box<SearchQuery> },
}

impl SearchQuery {
    pub fn field(predicate: FieldPredicate) -> Self {
        SearchQuery::Field(predicate)
    }

    pub fn not(child: SearchQuery) -> Self {
        SearchQuery::Not {
            child: Box::new(child),
        }
    }
}

/// A predicate on a specific field of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldPredicate {
    /// The note's path relative to the vault root.
    Path { matcher: StringMatcher },
    /// The note's file name without extension.
    Filename { matcher: StringMatcher },
    /// A body `#tag` or a frontmatter `tags` entry.
    Tag { value: String },
    /// Any body line.
    Content { matcher: StringMatcher },
    /// Sub-query must match within a single heading section.
    Section { query: Box<SearchQuery> },
    /// Sub-query must match within a single line.
    Line { query: Box<SearchQuery> },
    /// A frontmatter or inline property.
    Property {
        key: String,
        op: PropertyOp,
        value: Option<String>,
    },
}

/// How to match a string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StringMatcher {
    /// Substring match (bare word).
    Contains { value: String },
    /// Whole-string match (quoted).
    Exact { value: String },
    /// Regular expression (`/.../`).
    Regex { pattern: String },
}

/// Comparison operator for property predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOp {
    Exists,
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl PropertyOp {
    /// Operator for a comparison token such as `>=`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => PropertyOp::Eq,
            "!=" => PropertyOp::NotEq,
            "<" => PropertyOp::Lt,
            ">" => PropertyOp::Gt,
            "<=" => PropertyOp::Lte,
            ">=" => PropertyOp::Gte,
            _ => return None,
        })
    }
}

/// A search result for a single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Path to the matching note (relative to vault root).
    pub path: PathBuf,
    /// Individual matches within the note.
    pub matches: Vec<SearchMatch>,
}

/// A single match location within a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Which field matched (e.g. "content", "tag", "property:status").
    pub field: String,
    /// Line number (1-indexed) if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// The matched text or value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SearchMatch {
    pub fn new(field: impl Into<String>, line: Option<usize>, text: Option<String>) -> Self {
        Self {
            field: field.into(),
            line,
            text,
        }
    }
}
