//! A single markdown document and its extracted syntax.

use crate::config::TaskConfig;
use crate::error::Result;
use crate::parser::{
    self, scan_block_anchors, scan_headings, scan_inline_properties, scan_links, scan_tags,
    scan_tasks, split_frontmatter, strip_frontmatter, Frontmatter, SpanMask,
};
use crate::search::{CompiledQuery, SearchMatch};
use crate::types::{BlockAnchor, Heading, InlineProperty, Link, Tag, Task, TaskNode};
use std::path::{Path, PathBuf};

/// A document in the vault.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to vault root (e.g., "projects/Plan.md").
    pub path: PathBuf,

    /// Raw content, frontmatter included.
    pub content: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk.
    pub fn load(vault_root: &Path, relative_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(vault_root.join(relative_path))?;
        Ok(Self::new(relative_path, content))
    }

    /// File name without the `.md` extension.
    pub fn name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Content without frontmatter.
    pub fn body(&self) -> &str {
        strip_frontmatter(&self.content)
    }

    /// Line number where the body starts.
    pub fn body_start_line(&self) -> usize {
        split_frontmatter(&self.content).content_start_line
    }

    /// Parse the frontmatter; a document without one has an empty map.
    pub fn frontmatter(&self) -> Result<Frontmatter> {
        parser::parse_frontmatter_with_path(&self.content, &self.path)
    }

    /// Like [`Document::frontmatter`], but invalid YAML is logged and treated as empty.
    pub fn frontmatter_or_empty(&self) -> Frontmatter {
        self.frontmatter().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "ignoring frontmatter");
            Frontmatter::new()
        })
    }

    pub fn span_mask(&self) -> SpanMask {
        SpanMask::new(&self.content)
    }

    /// Links and embeds, in document order.
    pub fn links(&self) -> Vec<Link> {
        scan_links(&self.content, &self.span_mask())
    }

    pub fn tags(&self) -> Vec<Tag> {
        scan_tags(&self.content, &self.span_mask())
    }

    pub fn headings(&self) -> Vec<Heading> {
        scan_headings(&self.content, &self.span_mask())
    }

    pub fn block_anchors(&self) -> Vec<BlockAnchor> {
        scan_block_anchors(&self.content, &self.span_mask())
    }

    pub fn inline_properties(&self) -> Vec<InlineProperty> {
        scan_inline_properties(&self.content, &self.span_mask())
    }

    /// Flat list of tasks.
    pub fn tasks(&self, config: &TaskConfig) -> Vec<Task> {
        scan_tasks(&self.content, &self.span_mask(), config).tasks
    }

    /// Task hierarchy rooted at top-level tasks.
    pub fn task_trees(&self, config: &TaskConfig) -> Vec<TaskNode> {
        scan_tasks(&self.content, &self.span_mask(), config).trees
    }

    /// Evaluate a compiled query against this document.
    pub fn evaluate(&self, query: &CompiledQuery) -> Vec<SearchMatch> {
        query.evaluate(&self.path, &self.content, &self.frontmatter_or_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FrontmatterValue;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "---
title: Plan
tags: [project]
---
# Goals ^goals

See [[Roadmap#Q1|the roadmap]] and #planning.
Status: [status::active]

- [ ] Draft outline 📅 2024-03-01
    - [x] Collect notes
";

    fn sample() -> Document {
        Document::new("projects/Plan.md", SAMPLE)
    }

    #[test]
    fn test_name_and_body() {
        let doc = sample();
        assert_eq!(doc.name(), "Plan");
        assert_eq!(doc.body_start_line(), 5);
        assert!(doc.body().starts_with("# Goals"));
    }

    #[test]
    fn test_frontmatter() {
        let fm = sample().frontmatter().unwrap();
        assert_eq!(fm.get("title"), Some(&FrontmatterValue::Scalar("Plan".to_string())));
        assert_eq!(
            fm.get("tags"),
            Some(&FrontmatterValue::List(vec!["project".to_string()]))
        );
    }

    #[test]
    fn test_invalid_frontmatter_is_empty_for_search() {
        let doc = Document::new("bad.md", "---\n: [\n---\nbody text");
        assert!(doc.frontmatter().is_err());
        assert!(doc.frontmatter_or_empty().is_empty());

        let query = CompiledQuery::parse("body").unwrap();
        assert_eq!(doc.evaluate(&query).len(), 1);
    }

    #[test]
    fn test_extraction() {
        let doc = sample();
        let links = doc.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "Roadmap");
        assert_eq!(links[0].line, 7);

        assert_eq!(doc.tags()[0].name, "#planning");
        assert_eq!(doc.headings()[0].slug, "goals");
        assert_eq!(doc.block_anchors()[0].id, "goals");
        assert_eq!(doc.inline_properties()[0].value, "active");
    }

    #[test]
    fn test_tasks() {
        let doc = sample();
        let config = TaskConfig::obsidian_tasks();

        let tasks = doc.tasks(&config);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "Draft outline");
        assert_eq!(tasks[0].metadata.get("due").map(String::as_str), Some("2024-03-01"));
        assert_eq!(tasks[1].parent_line, Some(tasks[0].line));

        let trees = doc.task_trees(&config);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].children().len(), 1);
    }

    #[test]
    fn test_evaluate_uses_frontmatter() {
        let doc = sample();
        let matches = doc.evaluate(&CompiledQuery::parse("tag:project").unwrap());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, Some(1));
    }
}
