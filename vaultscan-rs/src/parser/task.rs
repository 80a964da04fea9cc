//! Task parsing with configurable emoji metadata fields.
//!
//! One pass over the lines of a document yields both the flat task list and
//! the task trees. Plain list items take part in the hierarchy so that notes
//! written under a task stay attached to it.

use crate::config::{EmojiFieldDef, EmojiValueType, TaskConfig};
use crate::parser::span::SpanMask;
use crate::parser::tag::scan_tags;
use crate::parser::wikilink::scan_links;
use crate::types::{Task, TaskLink, TaskNode};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Indent, list marker, checkbox symbol, rest of line.
static TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-*+]|\d+\.) \[(.)\] (.*)$").unwrap());

/// Indent, list marker, optional content.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-*+]|\d+\.)(?:[ \t]+(.*))?$").unwrap());

static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?").unwrap());

static BLOCK_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\^([a-zA-Z0-9_-]+)\s*$").unwrap());

/// Tasks of one document, flat and as trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskScan {
    pub tasks: Vec<Task>,
    pub trees: Vec<TaskNode>,
}

/// What a single line contributes to the hierarchy.
enum ListLine<'a> {
    Item { node: TaskNode, raw: &'a str },
    Other { indent: usize },
}

struct StackEntry {
    indent: usize,
    slot: usize,
    task_line: Option<usize>,
}

/// Scan `content` for tasks and list items, skipping fenced code.
pub fn scan_tasks(content: &str, mask: &SpanMask, config: &TaskConfig) -> TaskScan {
    let mut tasks = Vec::new();
    let mut nodes: Vec<TaskNode> = Vec::new();
    let mut children: Vec<Vec<usize>> = Vec::new();
    let mut roots = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        if mask.is_line_fenced(line_num) {
            continue;
        }

        let (node, raw) = match classify_line(line, line_num, config) {
            ListLine::Item { node, raw } => (node, raw),
            ListLine::Other { indent } => {
                pop_to(&mut stack, indent);
                continue;
            }
        };

        let indent = node.indent();
        pop_to(&mut stack, indent);

        if stack.is_empty() && !node.is_task() {
            // list text with no task above it
            continue;
        }

        let enclosing_task = stack.iter().rev().find_map(|entry| entry.task_line);
        tasks.extend(flat_task(&node, raw, enclosing_task));

        let slot = nodes.len();
        match stack.last() {
            Some(parent) => children[parent.slot].push(slot),
            None => roots.push(slot),
        }
        stack.push(StackEntry {
            indent,
            slot,
            task_line: node.is_task().then_some(line_num),
        });
        nodes.push(node);
        children.push(Vec::new());
    }

    TaskScan {
        tasks,
        trees: assemble(nodes, &children, &roots),
    }
}

fn pop_to(stack: &mut Vec<StackEntry>, indent: usize) {
    while stack.last().is_some_and(|entry| entry.indent >= indent) {
        stack.pop();
    }
}

/// Turn the arena into owned trees. Children always sit after their parent,
/// so filling slots from the back moves every subtree exactly once.
fn assemble(nodes: Vec<TaskNode>, children: &[Vec<usize>], roots: &[usize]) -> Vec<TaskNode> {
    let mut slots: Vec<Option<TaskNode>> = nodes.into_iter().map(Some).collect();

    for idx in (0..slots.len()).rev() {
        let kids: Vec<TaskNode> = children[idx]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();
        if let Some(node) = slots[idx].as_mut() {
            *node.children_mut() = kids;
        }
    }

    roots.iter().filter_map(|&root| slots[root].take()).collect()
}

/// Parse all tasks from content as a flat list.
pub fn parse_tasks(content: &str, config: &TaskConfig) -> Vec<Task> {
    scan_tasks(content, &SpanMask::new(content), config).tasks
}

/// Parse all tasks from content as trees.
pub fn parse_task_trees(content: &str, config: &TaskConfig) -> Vec<TaskNode> {
    scan_tasks(content, &SpanMask::new(content), config).trees
}

fn classify_line<'a>(line: &'a str, line_num: usize, config: &TaskConfig) -> ListLine<'a> {
    if let Some(caps) = TASK.captures(line) {
        let (rest, block_id) = extract_block_id(&caps[4]);
        let (description, metadata) = extract_metadata(&rest, config);
        let (links, tags) = description_refs(&description);

        return ListLine::Item {
            node: TaskNode::Task {
                line: line_num,
                marker: caps[2].to_string(),
                symbol: format!("[{}]", &caps[3]),
                description,
                indent: count_indent(&caps[1]),
                metadata,
                links,
                tags,
                block_id,
                children: Vec::new(),
            },
            raw: line,
        };
    }

    if let Some(caps) = LIST_ITEM.captures(line) {
        let rest = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        let (content, block_id) = extract_block_id(rest);

        return ListLine::Item {
            node: TaskNode::Text {
                line: line_num,
                content: content.trim_end().to_string(),
                marker: caps[2].to_string(),
                indent: count_indent(&caps[1]),
                block_id,
                children: Vec::new(),
            },
            raw: line,
        };
    }

    ListLine::Other {
        indent: count_indent(line),
    }
}

fn flat_task(node: &TaskNode, raw: &str, parent_line: Option<usize>) -> Option<Task> {
    let TaskNode::Task {
        line,
        marker,
        symbol,
        description,
        indent,
        metadata,
        links,
        tags,
        block_id,
        ..
    } = node
    else {
        return None;
    };

    Some(Task {
        line: *line,
        raw: raw.to_string(),
        marker: marker.clone(),
        symbol: symbol.clone(),
        description: description.clone(),
        indent: *indent,
        parent_line,
        metadata: metadata.clone(),
        links: links.clone(),
        tags: tags.clone(),
        block_id: block_id.clone(),
    })
}

/// Indentation level: one per tab plus one per four spaces.
fn count_indent(s: &str) -> usize {
    let mut spaces = 0;
    let mut tabs = 0;

    for c in s.chars() {
        match c {
            '\t' => tabs += 1,
            ' ' => spaces += 1,
            _ => break,
        }
    }

    tabs + spaces / 4
}

/// Split a trailing `^block-id` off `text`.
fn extract_block_id(text: &str) -> (String, Option<String>) {
    match BLOCK_ANCHOR.captures(text) {
        Some(caps) => {
            let start = caps.get(0).map_or(text.len(), |m| m.start());
            (text[..start].to_string(), Some(caps[1].to_string()))
        }
        None => (text.to_string(), None),
    }
}

fn description_refs(description: &str) -> (Vec<TaskLink>, Vec<String>) {
    let mask = SpanMask::new(description);
    let links = scan_links(description, &mask)
        .into_iter()
        .filter(|link| !link.embed)
        .map(|link| TaskLink {
            to: link.target,
            alias: link.alias,
        })
        .collect();
    let tags = scan_tags(description, &mask)
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    (links, tags)
}

/// Strip configured metadata from task text, in field order.
///
/// Returns the description (whitespace collapsed) and the extracted values.
pub fn extract_metadata(text: &str, config: &TaskConfig) -> (String, BTreeMap<String, String>) {
    let mut remaining = text.to_string();
    let mut metadata = BTreeMap::new();
    let delimiters: Vec<&str> = config
        .all_emojis()
        .into_iter()
        .filter(|emoji| !emoji.is_empty())
        .collect();

    for field in config.sorted_fields() {
        if field.emoji.is_empty() {
            continue;
        }
        if let Some(value) = extract_field(&mut remaining, field, &delimiters) {
            metadata.insert(field.field_name.clone(), value);
        }
    }

    let description = remaining.split_whitespace().collect::<Vec<_>>().join(" ");
    (description, metadata)
}

/// Extract one field from `remaining`, removing the delimiter and its value.
fn extract_field(remaining: &mut String, field: &EmojiFieldDef, delimiters: &[&str]) -> Option<String> {
    let pos = remaining.find(&field.emoji)?;
    let value_start = pos + field.emoji.len();
    let after = &remaining[value_start..];
    let lead = after.len() - after.trim_start().len();
    let trimmed = &after[lead..];

    let (value, consumed) = match &field.value_type {
        EmojiValueType::Date => {
            let m = DATE.find(after)?;
            (m.as_str().to_string(), m.end())
        }
        EmojiValueType::Number => {
            let m = NUMBER.find(trimmed)?;
            (m.as_str().to_string(), lead + m.end())
        }
        EmojiValueType::String => {
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            (trimmed[..end].to_string(), lead + end)
        }
        EmojiValueType::Text => {
            let end = delimiters
                .iter()
                .filter_map(|delimiter| trimmed.find(delimiter))
                .min()
                .unwrap_or(trimmed.len());
            (trimmed[..end].trim().to_string(), lead + end)
        }
        EmojiValueType::Flag { value } | EmojiValueType::Enum { value } => (value.clone(), 0),
    };

    let is_flag = matches!(
        field.value_type,
        EmojiValueType::Flag { .. } | EmojiValueType::Enum { .. }
    );
    if value.is_empty() && !is_flag {
        return None;
    }

    remaining.replace_range(pos..value_start + consumed, " ");
    Some(value)
}

/// Render task trees back to list lines, one indent string per depth level.
pub fn format_task_tree(trees: &[TaskNode], indent_string: &str) -> String {
    let mut lines = Vec::new();
    for node in trees {
        format_node(node, indent_string, 0, &mut lines);
    }
    lines.join("\n")
}

fn format_node(node: &TaskNode, indent_string: &str, depth: usize, lines: &mut Vec<String>) {
    let mut line = indent_string.repeat(depth);
    let block_id = match node {
        TaskNode::Task {
            marker,
            symbol,
            description,
            block_id,
            ..
        } => {
            line.push_str(&format!("{} {} {}", marker, symbol, description));
            block_id
        }
        TaskNode::Text {
            marker,
            content,
            block_id,
            ..
        } => {
            line.push_str(marker);
            if !content.is_empty() {
                line.push(' ');
                line.push_str(content);
            }
            block_id
        }
    };
    if let Some(id) = block_id {
        line.push_str(" ^");
        line.push_str(id);
    }
    lines.push(line);

    for child in node.children() {
        format_node(child, indent_string, depth + 1, lines);
    }
}

static EMPTY_METADATA: BTreeMap<String, String> = BTreeMap::new();

/// Parameters for formatting a single task line.
#[derive(Debug, Clone, Copy)]
pub struct FormatTaskParams<'a> {
    pub description: &'a str,
    pub symbol: &'a str,
    pub metadata: &'a BTreeMap<String, String>,
}

impl Default for FormatTaskParams<'_> {
    fn default() -> Self {
        Self {
            description: "",
            symbol: "[ ]",
            metadata: &EMPTY_METADATA,
        }
    }
}

/// Render a task line with its metadata in configured field order.
///
/// Flag and enum fields print their emoji only when the stored value is the
/// one the field stands for.
pub fn format_task(params: &FormatTaskParams, config: &TaskConfig) -> String {
    let mut line = format!("- {}", params.symbol);
    if !params.description.is_empty() {
        line.push(' ');
        line.push_str(params.description);
    }

    for field in config.sorted_fields() {
        let Some(value) = params.metadata.get(&field.field_name) else {
            continue;
        };
        match &field.value_type {
            EmojiValueType::Flag { value: wanted } | EmojiValueType::Enum { value: wanted } => {
                if value == wanted {
                    line.push(' ');
                    line.push_str(&field.emoji);
                }
            }
            _ => line.push_str(&format!(" {} {}", field.emoji, value)),
        }
    }

    line
}

/// `today` moved by `days`, or `None` outside chrono's date range.
fn shift_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_add_signed(Duration::try_days(days)?)
}

/// Resolve `today`, `tomorrow`, `yesterday`, `+3d`, `-1w`, `+2m` (30-day
/// months) or an ISO date to a `YYYY-MM-DD` string.
///
/// Offsets that leave the representable date range resolve to `None`.
pub fn parse_relative_date(date_str: &str, today: NaiveDate) -> Option<String> {
    let lower = date_str.trim().to_lowercase();
    let iso = |date: NaiveDate| date.format("%Y-%m-%d").to_string();

    match lower.as_str() {
        "today" => return Some(iso(today)),
        "tomorrow" => return shift_days(today, 1).map(iso),
        "yesterday" => return shift_days(today, -1).map(iso),
        _ => {}
    }

    let signed = lower
        .strip_prefix('+')
        .map(|rest| (1, rest))
        .or_else(|| lower.strip_prefix('-').map(|rest| (-1, rest)));
    if let Some((sign, offset)) = signed {
        let unit = offset.chars().last()?;
        let amount: i64 = offset[..offset.len() - unit.len_utf8()].parse().ok()?;
        let per_unit = match unit {
            'd' => 1,
            'w' => 7,
            'm' => 30,
            _ => return None,
        };
        let days = amount.checked_mul(per_unit)?.checked_mul(sign)?;
        return shift_days(today, days).map(iso);
    }

    NaiveDate::parse_from_str(&lower, "%Y-%m-%d").ok().map(iso)
}
