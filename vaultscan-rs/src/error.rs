//! Error types and exit codes for vaultscan.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes used by the `vaultscan` binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const INVALID_FRONTMATTER: i32 = 5;
    pub const INVALID_QUERY: i32 = 6;
    pub const LINT_ISSUES_FOUND: i32 = 10;
}

/// Main error type for vault and query operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Note not found: {0}")]
    NoteNotFound(PathBuf),

    #[error("Ambiguous note '{query}': {} notes match", matches.len())]
    AmbiguousNote { query: String, matches: Vec<PathBuf> },

    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0} lint issue(s) of a failing type found")]
    LintIssues(usize),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl VaultError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            VaultError::InvalidFrontmatter { .. } => exit_code::INVALID_FRONTMATTER,
            VaultError::Query(_) => exit_code::INVALID_QUERY,
            VaultError::LintIssues(_) => exit_code::LINT_ISSUES_FOUND,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Errors raised while tokenizing or parsing a search query.
///
/// Positions are character offsets into the query string for tokenizer
/// errors and token indices for parser errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty search query")]
    Empty,

    #[error("unterminated quoted string starting at position {0}")]
    UnterminatedQuote(usize),

    #[error("unterminated regex literal starting at position {0}")]
    UnterminatedRegex(usize),

    #[error("missing closing parenthesis")]
    UnbalancedParen,

    #[error("unexpected {found} at token {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("expected {expected}, got end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected {expected}, got {found}")]
    Expected {
        expected: &'static str,
        found: String,
    },

}

/// Result type alias for vaultscan operations.
pub type Result<T> = std::result::Result<T, VaultError>;
