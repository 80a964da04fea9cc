//! Properties command: frontmatter plus inline `[key::value]` fields.

use crate::cli::args::PropertiesArgs;
use crate::cli::output::Output;
use serde::Serialize;
use std::collections::BTreeMap;
use vaultscan::parser::{collect_inline_properties, Frontmatter};
use vaultscan::{InlineProperty, Result, Vault};

#[derive(Debug, Serialize)]
pub struct PropertiesOutput {
    pub frontmatter: Frontmatter,
    pub inline: InlineOutput,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InlineOutput {
    List(Vec<InlineProperty>),
    /// Key to values, in document order.
    Grouped(BTreeMap<String, Vec<String>>),
}

/// Invalid frontmatter is an error here (exit code 5), unlike in search.
pub fn run(vault: &Vault, args: &PropertiesArgs, output: &Output) -> Result<()> {
    let doc = vault.load_note(&vault.resolve_note(&args.note)?)?;
    let props = doc.inline_properties();

    let inline = if args.grouped {
        InlineOutput::Grouped(
            collect_inline_properties(&props)
                .into_iter()
                .map(|(key, props)| (key, props.into_iter().map(|p| p.value.clone()).collect()))
                .collect(),
        )
    } else {
        InlineOutput::List(props)
    };

    output.print(&PropertiesOutput {
        frontmatter: doc.frontmatter()?,
        inline,
    })
}
