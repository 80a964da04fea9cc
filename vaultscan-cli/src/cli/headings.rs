//! Heading-related CLI commands.

use crate::cli::args::HeadingsArgs;
use crate::cli::output::Output;
use serde::Serialize;
use vaultscan::parser::{build_heading_tree, filter_headings_by_level, HeadingNode};
use vaultscan::{Heading, Result, Vault};

#[derive(Debug, Serialize)]
pub struct HeadingsOutput {
    pub headings: Vec<Heading>,
}

#[derive(Debug, Serialize)]
pub struct NestedHeadingsOutput {
    pub headings: Vec<HeadingNode>,
}

pub fn run(vault: &Vault, args: &HeadingsArgs, output: &Output) -> Result<()> {
    let doc = vault.load_note(&vault.resolve_note(&args.note)?)?;
    let all = doc.headings();
    let headings: Vec<Heading> = filter_headings_by_level(&all, args.min_level, args.max_level)
        .into_iter()
        .cloned()
        .collect();

    if args.nested {
        output.print(&NestedHeadingsOutput {
            headings: build_heading_tree(&headings),
        })
    } else {
        output.print(&HeadingsOutput { headings })
    }
}
