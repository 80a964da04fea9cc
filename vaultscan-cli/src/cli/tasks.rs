//! Task-related CLI commands.

use crate::cli::args::{FormatTaskArgs, TasksArgs};
use crate::cli::list::select_notes;
use crate::cli::output::Output;
use chrono::Local;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use vaultscan::parser::{format_task, parse_relative_date, FormatTaskParams};
use vaultscan::{Document, EmojiValueType, Result, Task, TaskConfig, TaskNode, Vault, VaultError};

/// A task with the note it came from.
#[derive(Debug, Serialize)]
pub struct NoteTask {
    pub path: String,
    #[serde(flatten)]
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TasksOutput {
    pub tasks: Vec<NoteTask>,
}

/// Task trees of one note.
#[derive(Debug, Serialize)]
pub struct NoteTaskTrees {
    pub path: String,
    pub tasks: Vec<TaskNode>,
}

#[derive(Debug, Serialize)]
pub struct TaskTreesOutput {
    pub notes: Vec<NoteTaskTrees>,
}

#[derive(Debug, Serialize)]
pub struct FormatTaskOutput {
    pub formatted: String,
}

pub fn get_tasks(vault: &Vault, args: &TasksArgs, config: &TaskConfig, output: &Output) -> Result<()> {
    let notes: Vec<PathBuf> = match &args.note {
        Some(note) => vec![vault.resolve_note(note)?],
        None => select_notes(vault, args.glob.as_deref())?,
    };
    let docs = load_all(vault, &notes);

    let symbol_ok = |symbol: &str| args.symbol.is_empty() || args.symbol.iter().any(|s| s == symbol);

    if args.flat {
        let tasks = docs
            .par_iter()
            .flat_map_iter(|doc| {
                let path = doc.path.to_string_lossy().into_owned();
                doc.tasks(config)
                    .into_iter()
                    .map(move |task| NoteTask {
                        path: path.clone(),
                        task,
                    })
            })
            .filter(|t| symbol_ok(&t.task.symbol))
            .collect();
        return output.print(&TasksOutput { tasks });
    }

    let notes = docs
        .par_iter()
        .filter_map(|doc| {
            let tasks = retain_symbols(doc.task_trees(config), &symbol_ok);
            (!tasks.is_empty()).then(|| NoteTaskTrees {
                path: doc.path.to_string_lossy().into_owned(),
                tasks,
            })
        })
        .collect();
    output.print(&TaskTreesOutput { notes })
}

/// Drop tasks whose symbol is rejected, together with their subtrees, at
/// every depth. Text items stay under the tasks that are kept.
fn retain_symbols(nodes: Vec<TaskNode>, keep: &impl Fn(&str) -> bool) -> Vec<TaskNode> {
    nodes
        .into_iter()
        .filter(|node| match node {
            TaskNode::Task { symbol, .. } => keep(symbol),
            TaskNode::Text { .. } => true,
        })
        .map(|mut node| {
            let children = std::mem::take(node.children_mut());
            *node.children_mut() = retain_symbols(children, keep);
            node
        })
        .collect()
}

/// Load documents in parallel, keeping path order; unreadable ones are skipped.
pub fn load_all(vault: &Vault, notes: &[PathBuf]) -> Vec<Document> {
    notes
        .par_iter()
        .filter_map(|path| match vault.load_note(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping note");
                None
            }
        })
        .collect()
}

pub fn format(args: &FormatTaskArgs, config: &TaskConfig, output: &Output) -> Result<()> {
    let metadata = parse_fields(&args.fields, config)?;
    let formatted = format_task(
        &FormatTaskParams {
            description: &args.desc,
            symbol: &args.symbol,
            metadata: &metadata,
        },
        config,
    );
    output.print(&FormatTaskOutput { formatted })
}

/// Parse `KEY=VALUE` pairs; values of date fields may be relative dates.
fn parse_fields(fields: &[String], config: &TaskConfig) -> Result<BTreeMap<String, String>> {
    let today = Local::now().date_naive();
    let mut metadata = BTreeMap::new();

    for field in fields {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| VaultError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", field)))?;
        let key = key.trim();

        let is_date = config
            .fields
            .iter()
            .any(|f| f.field_name == key && f.value_type == EmojiValueType::Date);
        let value = if is_date {
            parse_relative_date(value, today)
                .ok_or_else(|| VaultError::InvalidArgument(format!("invalid date for {}: '{}'", key, value)))?
        } else {
            value.trim().to_string()
        };

        metadata.insert(key.to_string(), value);
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_fields() {
        let config = TaskConfig::obsidian_tasks();
        let fields = vec!["due=2024-03-01".to_string(), "priority=high".to_string()];
        let metadata = parse_fields(&fields, &config).unwrap();
        assert_eq!(metadata.get("due").map(String::as_str), Some("2024-03-01"));
        assert_eq!(metadata.get("priority").map(String::as_str), Some("high"));
    }

    #[test]
    fn test_parse_fields_relative_date() {
        let config = TaskConfig::obsidian_tasks();
        let metadata = parse_fields(&["scheduled=today".to_string()], &config).unwrap();
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(metadata.get("scheduled"), Some(&today));
    }

    #[test]
    fn test_parse_fields_errors() {
        let config = TaskConfig::obsidian_tasks();
        assert!(matches!(
            parse_fields(&["due".to_string()], &config),
            Err(VaultError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_fields(&["due=someday".to_string()], &config),
            Err(VaultError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_fields(&["due=+999999999999m".to_string()], &config),
            Err(VaultError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_retain_symbols_filters_every_depth() {
        let content = "\
- [ ] Open root
    - [x] Done child
        - [ ] Open under done
    - [ ] Open child
        - note
- [x] Done root";
        let trees = vaultscan::parser::parse_task_trees(content, &TaskConfig::empty());
        let kept = retain_symbols(trees, &|symbol: &str| symbol == "[ ]");

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].line(), 1);
        let children = kept[0].children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].line(), 4);
        assert_eq!(children[0].children()[0].line(), 5);
    }
}
