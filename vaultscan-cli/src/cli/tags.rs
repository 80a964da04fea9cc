//! Tag-related CLI commands.

use crate::cli::args::TagsArgs;
use crate::cli::list::select_notes;
use crate::cli::output::Output;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use vaultscan::parser::{group_tags_by_root, unique_tags};
use vaultscan::{Result, Tag, Vault};

/// Tags of a single note.
#[derive(Debug, Serialize)]
pub struct NoteTagsOutput {
    pub tags: Vec<Tag>,
}

/// Tags of a single note under their root tag.
#[derive(Debug, Serialize)]
pub struct GroupedTagsOutput {
    pub groups: BTreeMap<String, Vec<Tag>>,
}

/// Tags across the vault.
#[derive(Debug, Serialize)]
pub struct VaultTagsOutput {
    pub tags: Vec<VaultTagOutput>,
}

#[derive(Debug, Serialize)]
pub struct VaultTagOutput {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

pub fn run(vault: &Vault, args: &TagsArgs, output: &Output) -> Result<()> {
    match &args.note {
        Some(note) => {
            let doc = vault.load_note(&vault.resolve_note(note)?)?;
            let mut tags = doc.tags();
            if args.unique {
                tags = unique_tags(&tags).into_iter().cloned().collect();
            }
            if !args.group {
                return output.print(&NoteTagsOutput { tags });
            }

            let groups = group_tags_by_root(&tags)
                .into_iter()
                .map(|(root, grouped)| (root, grouped.into_iter().cloned().collect()))
                .collect();
            output.print(&GroupedTagsOutput { groups })
        }
        None => {
            let tags = vault_tags(vault, args.glob.as_deref(), args.counts)?;
            output.print(&VaultTagsOutput { tags })
        }
    }
}

fn vault_tags(vault: &Vault, glob: Option<&str>, with_counts: bool) -> Result<Vec<VaultTagOutput>> {
    let notes = select_notes(vault, glob)?;

    let per_note: Vec<Vec<Tag>> = notes
        .par_iter()
        .filter_map(|path| match vault.load_note(path) {
            Ok(doc) => Some(doc.tags()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping note");
                None
            }
        })
        .collect();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for tag in per_note.into_iter().flatten() {
        *counts.entry(tag.name).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .map(|(tag, count)| VaultTagOutput {
            tag,
            count: with_counts.then_some(count),
        })
        .collect())
}
