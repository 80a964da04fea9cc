//! Outgoing and incoming links across a vault.

use crate::config::TaskConfig;
use crate::document::Document;
use crate::error::Result;
use crate::types::Link;
use crate::vault::Vault;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::resolution::LinkResolver;

/// Where a link sits in its note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkContext {
    Body,
    Task,
    /// Value of a `[key::value]` inline property.
    Inline { key: String },
    /// Value of a top-level frontmatter property.
    Frontmatter { key: String },
}

/// An outgoing link and what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    #[serde(flatten)]
    pub link: Link,

    pub context: LinkContext,

    /// Target note or attachment; `None` for a broken link.
    pub resolved: Option<PathBuf>,
}

/// A link pointing at a note, seen from the target's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomingLink {
    /// The note containing the link.
    pub from: PathBuf,

    #[serde(flatten)]
    pub link: Link,

    pub context: LinkContext,
}

/// Every link in a vault, indexed both ways.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    outgoing: BTreeMap<PathBuf, Vec<ResolvedLink>>,
    /// Keyed by resolved target path.
    incoming: BTreeMap<PathBuf, Vec<IncomingLink>>,
}

impl LinkGraph {
    /// Load every note and attachment of `vault` and link them up.
    pub fn build(vault: &Vault) -> Result<Self> {
        let docs = vault.load_all()?;
        let resolver = LinkResolver::new(&docs).with_attachments(vault.list_attachments()?);
        Ok(Self::from_documents(&docs, &resolver))
    }

    /// Link up already loaded documents.
    pub fn from_documents(docs: &[Document], resolver: &LinkResolver) -> Self {
        let mut outgoing = BTreeMap::new();
        let mut incoming: BTreeMap<PathBuf, Vec<IncomingLink>> = BTreeMap::new();

        for doc in docs {
            let links: Vec<ResolvedLink> = ContextFinder::new(doc)
                .classify(doc.links())
                .into_iter()
                .map(|(link, context)| {
                    let resolved = resolver.resolve(&link.target).map(Path::to_path_buf);
                    ResolvedLink {
                        link,
                        context,
                        resolved,
                    }
                })
                .collect();

            for resolved_link in &links {
                if let Some(target) = &resolved_link.resolved {
                    incoming.entry(target.clone()).or_default().push(IncomingLink {
                        from: doc.path.clone(),
                        link: resolved_link.link.clone(),
                        context: resolved_link.context.clone(),
                    });
                }
            }

            outgoing.insert(doc.path.clone(), links);
        }

        tracing::debug!(notes = outgoing.len(), targets = incoming.len(), "built link graph");
        Self { outgoing, incoming }
    }

    /// Links from `path`, in document order.
    pub fn outgoing(&self, path: &Path) -> &[ResolvedLink] {
        self.outgoing.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Links to `path`, ordered by source note then line.
    pub fn incoming(&self, path: &Path) -> &[IncomingLink] {
        self.incoming.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Notes in the graph, in path order.
    pub fn notes(&self) -> impl Iterator<Item = &Path> {
        self.outgoing.keys().map(PathBuf::as_path)
    }
}

/// Per-document line lookups for classifying links.
struct ContextFinder<'a> {
    lines: Vec<&'a str>,
    body_start_line: usize,
    task_lines: BTreeSet<usize>,
    inline: Vec<(usize, String, String)>,
}

impl<'a> ContextFinder<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            lines: doc.content.lines().collect(),
            body_start_line: doc.body_start_line(),
            task_lines: doc
                .tasks(&TaskConfig::empty())
                .iter()
                .map(|task| task.line)
                .collect(),
            inline: doc
                .inline_properties()
                .into_iter()
                .map(|prop| (prop.line, prop.key, prop.value))
                .collect(),
        }
    }

    fn classify(&self, links: Vec<Link>) -> Vec<(Link, LinkContext)> {
        links
            .into_iter()
            .map(|link| {
                let context = self.context_of(&link);
                (link, context)
            })
            .collect()
    }

    fn context_of(&self, link: &Link) -> LinkContext {
        if link.line < self.body_start_line {
            return LinkContext::Frontmatter {
                key: self.frontmatter_key(link.line),
            };
        }
        if self.task_lines.contains(&link.line) {
            return LinkContext::Task;
        }

        let inline_key = self
            .inline
            .iter()
            .find(|(line, _, value)| *line == link.line && value.contains(&link.target))
            .map(|(_, key, _)| key.clone());
        match inline_key {
            Some(key) => LinkContext::Inline { key },
            None => LinkContext::Body,
        }
    }

    /// The nearest top-level `key:` at or above `line`.
    fn frontmatter_key(&self, line: usize) -> String {
        self.lines
            .iter()
            .take(line)
            .rev()
            .find_map(|text| {
                if text.starts_with([' ', '\t', '-', '#']) {
                    return None;
                }
                let (key, _) = text.split_once(':')?;
                Some(key.trim().to_string())
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_vault() -> (TempDir, Vault) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(
            root.join("Note A.md"),
            "---\ntitle: Note A\naliases:\n  - alias-a\n---\n\n# Note A\n\nLinks to [[Note B]] and [[Note C#heading]].\n\n![[chart.png]] and ![[gone.png]]\n",
        )
        .unwrap();
        fs::write(
            root.join("Note B.md"),
            "---\nparent: \"[[Note A]]\"\n---\n\n# Note B\n\nLinks back to [[alias-a]].\n\n- [ ] Task with [[Note A]] link\n\n[owner:: [[Note C]]]\n",
        )
        .unwrap();
        fs::write(
            root.join("Note C.md"),
            "# Note C\n\nSee [[Missing]] and `[[Not A Link]]`.\n\n## heading\n",
        )
        .unwrap();
        fs::write(root.join("chart.png"), "png").unwrap();

        let vault = Vault::new(root).unwrap();
        (temp, vault)
    }

    #[test]
    fn test_outgoing_links_resolved() {
        let (_temp, vault) = create_test_vault();
        let graph = LinkGraph::build(&vault).unwrap();

        let outgoing = graph.outgoing(Path::new("Note A.md"));
        let resolved: Vec<(&str, Option<&Path>)> = outgoing
            .iter()
            .map(|l| (l.link.target.as_str(), l.resolved.as_deref()))
            .collect();
        assert_eq!(
            resolved,
            vec![
                ("Note B", Some(Path::new("Note B.md"))),
                ("Note C", Some(Path::new("Note C.md"))),
                ("chart.png", Some(Path::new("chart.png"))),
                ("gone.png", None),
            ]
        );

        let note_c = graph.outgoing(Path::new("Note C.md"));
        assert_eq!(note_c.len(), 1);
        assert_eq!(note_c[0].resolved, None);
    }

    #[test]
    fn test_incoming_links() {
        let (_temp, vault) = create_test_vault();
        let graph = LinkGraph::build(&vault).unwrap();

        let incoming = graph.incoming(Path::new("Note A.md"));
        let lines: Vec<(usize, &LinkContext)> =
            incoming.iter().map(|l| (l.link.line, &l.context)).collect();
        assert_eq!(
            lines,
            vec![
                (
                    2,
                    &LinkContext::Frontmatter {
                        key: "parent".to_string()
                    }
                ),
                (7, &LinkContext::Body),
                (9, &LinkContext::Task),
            ]
        );
        assert!(incoming.iter().all(|l| l.from == PathBuf::from("Note B.md")));

        assert_eq!(graph.incoming(Path::new("Note B.md"))[0].from, PathBuf::from("Note A.md"));
        assert!(graph.incoming(Path::new("Nowhere.md")).is_empty());
    }

    #[test]
    fn test_inline_property_context() {
        let (_temp, vault) = create_test_vault();
        let graph = LinkGraph::build(&vault).unwrap();

        let incoming = graph.incoming(Path::new("Note C.md"));
        assert_eq!(incoming.len(), 2);
        assert_eq!(incoming[0].context, LinkContext::Body);
        assert_eq!(
            incoming[1].context,
            LinkContext::Inline {
                key: "owner".to_string()
            }
        );
    }

    #[test]
    fn test_notes_in_path_order() {
        let (_temp, vault) = create_test_vault();
        let graph = LinkGraph::build(&vault).unwrap();
        let notes: Vec<&Path> = graph.notes().collect();
        assert_eq!(
            notes,
            vec![Path::new("Note A.md"), Path::new("Note B.md"), Path::new("Note C.md")]
        );
    }

    #[test]
    fn test_context_serialization() {
        let json = serde_json::to_value(LinkContext::Inline {
            key: "owner".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "inline", "key": "owner"}));
    }
}
