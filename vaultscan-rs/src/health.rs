//! Vault health checks.
//!
//! Broken links and embeds, dangling heading and block references, orphan
//! notes, duplicate aliases and block ids, empty notes and frontmatter
//! problems, all reported as [`Issue`]s.

use crate::document::Document;
use crate::error::Result;
use crate::graph::{LinkGraph, LinkResolver};
use crate::parser::{
    extract_frontmatter, find_block_by_id, find_heading_by_slug, find_heading_by_text,
    format_wikilink, slugify,
};
use crate::types::Link;
use crate::vault::Vault;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kinds of issue the checker detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    BrokenLinks,
    BrokenEmbeds,
    BrokenHeadingLinks,
    BrokenBlockRefs,
    Orphans,
    DuplicateAliases,
    DuplicateBlockIds,
    EmptyNotes,
    MissingFrontmatter,
    InvalidFrontmatter,
}

impl IssueType {
    pub fn all() -> &'static [IssueType] {
        &[
            IssueType::BrokenLinks,
            IssueType::BrokenEmbeds,
            IssueType::BrokenHeadingLinks,
            IssueType::BrokenBlockRefs,
            IssueType::Orphans,
            IssueType::DuplicateAliases,
            IssueType::DuplicateBlockIds,
            IssueType::EmptyNotes,
            IssueType::MissingFrontmatter,
            IssueType::InvalidFrontmatter,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::BrokenLinks => "broken-links",
            IssueType::BrokenEmbeds => "broken-embeds",
            IssueType::BrokenHeadingLinks => "broken-heading-links",
            IssueType::BrokenBlockRefs => "broken-block-refs",
            IssueType::Orphans => "orphans",
            IssueType::DuplicateAliases => "duplicate-aliases",
            IssueType::DuplicateBlockIds => "duplicate-block-ids",
            IssueType::EmptyNotes => "empty-notes",
            IssueType::MissingFrontmatter => "missing-frontmatter",
            IssueType::InvalidFrontmatter => "invalid-frontmatter",
        }
    }

    /// Advisory issues; the rest are errors.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            IssueType::Orphans | IssueType::EmptyNotes | IssueType::MissingFrontmatter
        )
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        IssueType::all()
            .iter()
            .find(|issue_type| issue_type.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown issue type '{}'", s))
    }
}

/// A problem found in one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Issue {
    fn new(issue_type: IssueType, file: &Path, message: String) -> Self {
        Self {
            issue_type,
            file: file.to_path_buf(),
            line: None,
            message,
            target: None,
        }
    }

    fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Issue counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

/// Runs the enabled checks over a vault.
pub struct HealthChecker<'a> {
    vault: &'a Vault,
    include_types: Option<BTreeSet<IssueType>>,
    exclude_types: BTreeSet<IssueType>,
    glob_pattern: Option<String>,
}

impl<'a> HealthChecker<'a> {
    pub fn new(vault: &'a Vault) -> Self {
        Self {
            vault,
            include_types: None,
            exclude_types: BTreeSet::new(),
            glob_pattern: None,
        }
    }

    /// Only check these issue types.
    pub fn only(mut self, types: impl IntoIterator<Item = IssueType>) -> Self {
        self.include_types = Some(types.into_iter().collect());
        self
    }

    /// Skip these issue types.
    pub fn ignore(mut self, types: impl IntoIterator<Item = IssueType>) -> Self {
        self.exclude_types = types.into_iter().collect();
        self
    }

    /// Only report issues in notes matching `pattern`.
    ///
    /// Links are still resolved against the whole vault.
    pub fn glob(mut self, pattern: &str) -> Self {
        self.glob_pattern = Some(pattern.to_string());
        self
    }

    fn should_check(&self, issue_type: IssueType) -> bool {
        if self.exclude_types.contains(&issue_type) {
            return false;
        }
        self.include_types
            .as_ref()
            .is_none_or(|include| include.contains(&issue_type))
    }

    /// Run the checks; issues come grouped by note, then vault-wide ones.
    pub fn run(&self) -> Result<Vec<Issue>> {
        let docs = self.vault.load_all()?;
        let resolver = LinkResolver::new(&docs).with_attachments(self.vault.list_attachments()?);
        let graph = LinkGraph::from_documents(&docs, &resolver);

        let mut issues = self.check(&docs, &graph);

        if let Some(pattern) = &self.glob_pattern {
            let scope: BTreeSet<PathBuf> =
                self.vault.list_notes_matching(pattern)?.into_iter().collect();
            issues.retain(|issue| scope.contains(&issue.file));
        }

        tracing::debug!(notes = docs.len(), issues = issues.len(), "health check finished");
        Ok(issues)
    }

    fn check(&self, docs: &[Document], graph: &LinkGraph) -> Vec<Issue> {
        let by_path: BTreeMap<&Path, &Document> =
            docs.iter().map(|doc| (doc.path.as_path(), doc)).collect();
        let mut alias_map: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let mut issues = Vec::new();

        for doc in docs {
            let path = doc.path.as_path();

            match doc.frontmatter() {
                Ok(fm) => {
                    if let Some(aliases) = fm.get("aliases") {
                        for alias in aliases.items() {
                            alias_map
                                .entry(alias.trim().to_lowercase())
                                .or_default()
                                .push(doc.path.clone());
                        }
                    }
                }
                Err(e) => {
                    if self.should_check(IssueType::InvalidFrontmatter) {
                        issues.push(Issue::new(IssueType::InvalidFrontmatter, path, e.to_string()));
                    }
                }
            }

            if self.should_check(IssueType::MissingFrontmatter)
                && extract_frontmatter(&doc.content).is_none()
            {
                issues.push(Issue::new(
                    IssueType::MissingFrontmatter,
                    path,
                    "Note has no frontmatter".to_string(),
                ));
            }

            if self.should_check(IssueType::EmptyNotes) && doc.body().trim().is_empty() {
                issues.push(Issue::new(
                    IssueType::EmptyNotes,
                    path,
                    "Note has no content".to_string(),
                ));
            }

            if self.should_check(IssueType::DuplicateBlockIds) {
                let mut seen: BTreeMap<String, usize> = BTreeMap::new();
                for anchor in doc.block_anchors() {
                    match seen.get(&anchor.id) {
                        Some(first_line) => issues.push(
                            Issue::new(
                                IssueType::DuplicateBlockIds,
                                path,
                                format!("Block id '^{}' already used on line {}", anchor.id, first_line),
                            )
                            .at(anchor.line)
                            .target(anchor.id.clone()),
                        ),
                        None => {
                            seen.insert(anchor.id, anchor.line);
                        }
                    }
                }
            }

            for resolved_link in graph.outgoing(path) {
                let link = &resolved_link.link;
                let issue = match &resolved_link.resolved {
                    None => self.broken_link(path, link),
                    Some(target) => by_path
                        .get(target.as_path())
                        .and_then(|target_doc| self.broken_reference(path, link, target_doc)),
                };
                issues.extend(issue);
            }
        }

        if self.should_check(IssueType::Orphans) {
            for doc in docs {
                let linked = graph
                    .incoming(&doc.path)
                    .iter()
                    .any(|incoming| incoming.from != doc.path);
                if !linked {
                    issues.push(Issue::new(
                        IssueType::Orphans,
                        &doc.path,
                        "Note has no incoming links".to_string(),
                    ));
                }
            }
        }

        if self.should_check(IssueType::DuplicateAliases) {
            for (alias, paths) in alias_map.iter().filter(|(_, paths)| paths.len() > 1) {
                for path in paths {
                    let others: Vec<String> = paths
                        .iter()
                        .filter(|other| *other != path)
                        .map(|other| other.display().to_string())
                        .collect();
                    issues.push(
                        Issue::new(
                            IssueType::DuplicateAliases,
                            path,
                            format!("Alias '{}' also defined in: {}", alias, others.join(", ")),
                        )
                        .target(alias.clone()),
                    );
                }
            }
        }

        issues
    }

    fn broken_link(&self, path: &Path, link: &Link) -> Option<Issue> {
        let (issue_type, kind) = if link.embed {
            (IssueType::BrokenEmbeds, "embed")
        } else {
            (IssueType::BrokenLinks, "link")
        };
        self.should_check(issue_type).then(|| {
            Issue::new(
                issue_type,
                path,
                format!("Broken {}: {} does not resolve", kind, format_wikilink(link)),
            )
            .at(link.line)
            .target(link.target.clone())
        })
    }

    /// A heading or block reference missing from a resolved target.
    fn broken_reference(&self, path: &Path, link: &Link, target: &Document) -> Option<Issue> {
        if let Some(block_id) = &link.block_id {
            if !self.should_check(IssueType::BrokenBlockRefs)
                || find_block_by_id(&target.content, block_id).is_some()
            {
                return None;
            }
            return Some(
                Issue::new(
                    IssueType::BrokenBlockRefs,
                    path,
                    format!("Block '^{}' not found: {}", block_id, format_wikilink(link)),
                )
                .at(link.line)
                .target(link.full_target()),
            );
        }

        let heading = link.heading.as_ref()?;
        if !self.should_check(IssueType::BrokenHeadingLinks) {
            return None;
        }
        let headings = target.headings();
        let found = find_heading_by_text(&headings, heading.trim()).is_some()
            || find_heading_by_slug(&headings, &slugify(heading)).is_some();
        (!found).then(|| {
            Issue::new(
                IssueType::BrokenHeadingLinks,
                path,
                format!("Heading '{}' not found: {}", heading, format_wikilink(link)),
            )
            .at(link.line)
            .target(link.full_target())
        })
    }
}

pub fn compute_summary(issues: &[Issue]) -> LintSummary {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for issue in issues {
        *by_type.entry(issue.issue_type.to_string()).or_insert(0) += 1;
    }
    LintSummary {
        total: issues.len(),
        by_type,
    }
}

/// Format issues as GitHub Actions workflow annotations.
pub fn format_github_actions(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| {
            let level = if issue.issue_type.is_warning() {
                "warning"
            } else {
                "error"
            };
            let line = issue
                .line
                .map(|l| format!(",line={}", l))
                .unwrap_or_default();
            format!("::{} file={}{}::{}\n", level, issue.file.display(), line, issue.message)
        })
        .collect()
}
