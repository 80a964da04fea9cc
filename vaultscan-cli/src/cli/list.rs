//! List command implementation.

use crate::cli::args::ListArgs;
use crate::cli::output::Output;
use serde::Serialize;
use std::path::PathBuf;
use vaultscan::{Result, Vault};

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub notes: Vec<String>,
    pub total: usize,
}

/// Notes selected by an optional glob, or the whole vault.
pub fn select_notes(vault: &Vault, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    match glob {
        Some(pattern) => vault.list_notes_matching(pattern),
        None => vault.list_notes(),
    }
}

pub fn run(vault: &Vault, args: &ListArgs, output: &Output) -> Result<()> {
    let notes: Vec<String> = select_notes(vault, args.glob.as_deref())?
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();

    output.print(&ListResponse {
        total: notes.len(),
        notes,
    })
}
