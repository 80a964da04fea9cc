//! Shared record types produced by the scanners and the task engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A wikilink or embed found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The target note, trimmed (e.g. "folder/My Note").
    pub target: String,

    /// Optional display alias (the part after `|`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Optional heading reference (the part after `#`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Optional block reference (the part after `#^`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Whether this is an embed (`![[...]]`) rather than a link.
    pub embed: bool,

    /// Line number where this link appears (1-indexed).
    pub line: usize,
}

impl Link {
    /// Returns the full link target including heading/block reference.
    pub fn full_target(&self) -> String {
        match (&self.heading, &self.block_id) {
            (_, Some(block_id)) => format!("{}#^{}", self.target, block_id),
            (Some(heading), None) => format!("{}#{}", self.target, heading),
            (None, None) => self.target.clone(),
        }
    }

    /// Returns the text a reader sees for this link.
    pub fn display_text(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }
}

/// A tag found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The full tag including `#` (e.g. "#rust" or "#tray/autonomy").
    pub name: String,

    /// Line number where this tag appears (1-indexed).
    pub line: usize,
}

impl Tag {
    pub fn without_hash(&self) -> &str {
        self.name.strip_prefix('#').unwrap_or(&self.name)
    }

    /// Returns the enclosing tag of a nested tag: "#a/b/c" -> "#a/b".
    pub fn parent(&self) -> Option<String> {
        self.without_hash()
            .rsplit_once('/')
            .map(|(parent, _)| format!("#{}", parent))
    }

    /// Returns every enclosing tag, outermost first: "#a/b/c" -> ["#a", "#a/b"].
    pub fn ancestors(&self) -> Vec<String> {
        let bare = self.without_hash();
        bare.match_indices('/')
            .map(|(idx, _)| format!("#{}", &bare[..idx]))
            .collect()
    }
}

/// A heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// The heading text without the `#` prefix and without a trailing block anchor.
    pub text: String,

    /// The heading level (1-6).
    pub level: u8,

    /// Line number where this heading appears (1-indexed).
    pub line: usize,

    /// Unique (per document) slug used for `[[note#heading]]` links.
    pub slug: String,
}

/// A `^block-id` anchor found at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnchor {
    /// The anchor id without the `^` prefix.
    pub id: String,

    /// Line number where this anchor appears (1-indexed).
    pub line: usize,

    /// Kind of block the anchored line starts.
    pub block_type: BlockType,
}

/// Kind of block a line belongs to, judged by its leading syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Paragraph,
    ListItem,
    Heading,
    Blockquote,
    Table,
    CodeBlock,
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BlockType::Paragraph => "paragraph",
            BlockType::ListItem => "listitem",
            BlockType::Heading => "heading",
            BlockType::Blockquote => "blockquote",
            BlockType::Table => "table",
            BlockType::CodeBlock => "codeblock",
        };
        f.write_str(name)
    }
}

/// A bracketed `[key::value]` property found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineProperty {
    pub key: String,

    /// Trimmed value; may hold a wikilink such as `[[Other Note]]`.
    pub value: String,

    /// Line number where this property appears (1-indexed).
    pub line: usize,
}

/// A link found inside a task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLink {
    /// The target note.
    pub to: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A checkbox task as a flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Line number (1-indexed).
    pub line: usize,

    /// The raw task line as it appears in the document.
    pub raw: String,

    /// List marker: `-`, `*`, `+` or an ordinal such as `1.`.
    pub marker: String,

    /// The checkbox including brackets (e.g. "[ ]", "[x]", "[>]").
    pub symbol: String,

    /// The description with metadata and block anchor removed.
    pub description: String,

    /// Indentation level (tabs + spaces / 4).
    pub indent: usize,

    /// Line of the nearest enclosing task, if nested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_line: Option<usize>,

    /// Metadata extracted by the configured emoji fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<TaskLink>,

    /// Tags in the description, including the leading `#`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
}

/// A node of a task tree.
///
/// `Text` nodes are plain list items; they only appear below a `Task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskNode {
    Task {
        line: usize,
        marker: String,
        symbol: String,
        description: String,
        indent: usize,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        metadata: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        links: Vec<TaskLink>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<TaskNode>,
    },
    Text {
        line: usize,
        content: String,
        marker: String,
        indent: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<TaskNode>,
    },
}

impl TaskNode {
    pub fn line(&self) -> usize {
        match self {
            TaskNode::Task { line, .. } | TaskNode::Text { line, .. } => *line,
        }
    }

    pub fn indent(&self) -> usize {
        match self {
            TaskNode::Task { indent, .. } | TaskNode::Text { indent, .. } => *indent,
        }
    }

    pub fn children(&self) -> &[TaskNode] {
        match self {
            TaskNode::Task { children, .. } | TaskNode::Text { children, .. } => children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<TaskNode> {
        match self {
            TaskNode::Task { children, .. } | TaskNode::Text { children, .. } => children,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self, TaskNode::Task { .. })
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(TaskNode::count).sum::<usize>()
    }
}
