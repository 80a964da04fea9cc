//! Link target resolution.
//!
//! A note target resolves in this order:
//! 1. Exact vault-relative path (only when the target contains `/`)
//! 2. File name, case-insensitive; the first note in path order wins
//! 3. Frontmatter alias, case-insensitive
//!
//! Media targets (`diagram.png`) resolve against attachments instead.

use crate::document::Document;
use crate::parser::is_media_embed;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Lookup tables for resolving link targets to vault paths.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    /// Lowercase path without `.md`.
    paths: BTreeMap<String, PathBuf>,
    /// Lowercase file stem.
    stems: BTreeMap<String, PathBuf>,
    /// Lowercase alias.
    aliases: BTreeMap<String, PathBuf>,
    /// Lowercase attachment path and file name.
    attachments: BTreeMap<String, PathBuf>,
}

impl LinkResolver {
    /// Index the given notes. Documents should be in path order.
    pub fn new(docs: &[Document]) -> Self {
        let mut resolver = Self::default();

        for doc in docs {
            let key = doc.path.to_string_lossy().to_lowercase();
            let key = key.strip_suffix(".md").unwrap_or(&key).to_string();
            resolver.paths.insert(key, doc.path.clone());
            resolver
                .stems
                .entry(doc.name().to_lowercase())
                .or_insert_with(|| doc.path.clone());

            if let Some(aliases) = doc.frontmatter_or_empty().get("aliases") {
                for alias in aliases.items() {
                    resolver
                        .aliases
                        .entry(alias.trim().to_lowercase())
                        .or_insert_with(|| doc.path.clone());
                }
            }
        }

        resolver
    }

    /// Add attachment files, vault-relative.
    pub fn with_attachments(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        for file in files {
            if let Some(name) = file.file_name() {
                self.attachments
                    .entry(name.to_string_lossy().to_lowercase())
                    .or_insert_with(|| file.clone());
            }
            self.attachments
                .insert(file.to_string_lossy().to_lowercase(), file);
        }
        self
    }

    /// Resolve a link target; `None` means the link is broken.
    pub fn resolve(&self, target: &str) -> Option<&Path> {
        let lower = target.trim().to_lowercase();

        if is_media_embed(&lower) {
            return self.attachments.get(&lower).map(PathBuf::as_path);
        }

        let key = lower.strip_suffix(".md").unwrap_or(&lower);
        let by_name = if key.contains('/') {
            self.paths.get(key)
        } else {
            self.stems.get(key)
        };

        by_name
            .or_else(|| self.aliases.get(&lower))
            .map(PathBuf::as_path)
    }
}
