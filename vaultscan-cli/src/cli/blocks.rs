//! Block anchor CLI command.

use crate::cli::args::NoteArgs;
use crate::cli::output::Output;
use serde::Serialize;
use vaultscan::{BlockAnchor, Result, Vault};

#[derive(Debug, Serialize)]
pub struct BlocksOutput {
    pub blocks: Vec<BlockAnchor>,
}

pub fn run(vault: &Vault, args: &NoteArgs, output: &Output) -> Result<()> {
    let doc = vault.load_note(&vault.resolve_note(&args.note)?)?;
    output.print(&BlocksOutput {
        blocks: doc.block_anchors(),
    })
}
