//! Search command implementation.

use crate::cli::args::SearchArgs;
use crate::cli::list::select_notes;
use crate::cli::output::Output;
use rayon::prelude::*;
use serde::Serialize;
use vaultscan::{CompiledQuery, Result, SearchResult, Vault};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Matching notes before `--limit` is applied.
    pub total: usize,
    pub results: Vec<SearchResult>,
}

pub fn run(vault: &Vault, args: &SearchArgs, output: &Output) -> Result<()> {
    // A malformed query fails here, before any note is read.
    let query = CompiledQuery::parse(&args.query)?;
    let notes = select_notes(vault, args.glob.as_deref())?;
    tracing::info!(notes = notes.len(), query = %args.query, "searching");

    let mut results: Vec<SearchResult> = notes
        .par_iter()
        .filter_map(|path| {
            let doc = match vault.load_note(path) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping note");
                    return None;
                }
            };
            query.search(&doc.path, &doc.content, &doc.frontmatter_or_empty())
        })
        .collect();

    results.sort_by(|a, b| a.path.cmp(&b.path));
    let total = results.len();
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    output.print(&SearchResponse {
        query: args.query.clone(),
        total,
        results,
    })
}
