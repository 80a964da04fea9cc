//! A directory of markdown documents.

use crate::document::Document;
use crate::error::{Result, VaultError};
use glob::glob;
use std::path::{Path, PathBuf};

/// A vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
}

impl Vault {
    /// Open a vault; the root must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(VaultError::VaultNotFound(root));
        }

        Ok(Self { root })
    }

    /// Full path to a note.
    pub fn note_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Add the `.md` extension if it is missing.
    pub fn normalize_note_path(&self, path: &str) -> PathBuf {
        let path = path.trim();
        if path.ends_with(".md") {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{}.md", path))
        }
    }

    pub fn note_exists(&self, relative_path: &Path) -> bool {
        self.note_path(relative_path).is_file()
    }

    /// Load a note by its vault-relative path.
    pub fn load_note(&self, relative_path: &Path) -> Result<Document> {
        if !self.note_exists(relative_path) {
            return Err(VaultError::NoteNotFound(relative_path.to_path_buf()));
        }
        Document::load(&self.root, relative_path)
    }

    /// All markdown files in the vault, hidden paths skipped, sorted.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        let notes = self.glob_notes("**/*.md")?;
        Ok(notes.into_iter().filter(|path| !is_hidden(path)).collect())
    }

    /// Load every note in path order; unreadable notes are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<Document>> {
        let docs = self
            .list_notes()?
            .iter()
            .filter_map(|path| match self.load_note(path) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping note");
                    None
                }
            })
            .collect();
        Ok(docs)
    }

    /// Markdown files matching a vault-relative glob pattern, sorted.
    pub fn list_notes_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        self.glob_notes(pattern)
    }

    /// Non-markdown files (images, PDFs, ...) that embeds can point at.
    pub fn list_attachments(&self) -> Result<Vec<PathBuf>> {
        let files = self.glob_files("**/*", |path| !is_markdown(path))?;
        Ok(files.into_iter().filter(|path| !is_hidden(path)).collect())
    }

    fn glob_notes(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        self.glob_files(pattern, is_markdown)
    }

    fn glob_files(&self, pattern: &str, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let full_pattern = self.root.join(pattern);
        let mut files = Vec::new();

        for entry in glob(&full_pattern.to_string_lossy())? {
            match entry {
                Ok(path) => {
                    if !path.is_file() || !keep(&path) {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        files.push(relative.to_path_buf());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "skipping unreadable path"),
            }
        }

        files.sort();
        Ok(files)
    }

    /// Resolve a user-supplied note reference to a path.
    ///
    /// Tries the path as given (with or without `.md`), then a
    /// case-insensitive file name match, then frontmatter `aliases`.
    pub fn resolve_note(&self, query: &str) -> Result<PathBuf> {
        let normalized = self.normalize_note_path(query);
        if self.note_exists(&normalized) {
            return Ok(normalized);
        }

        let notes = self.list_notes()?;
        let query_lower = query.trim().to_lowercase();

        let by_name: Vec<PathBuf> = notes
            .iter()
            .filter(|path| {
                path.file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().to_lowercase() == query_lower)
            })
            .cloned()
            .collect();
        if !by_name.is_empty() {
            return single_match(query, by_name);
        }

        // Loads every note: only reached when nothing matched by name.
        let by_alias: Vec<PathBuf> = notes
            .into_iter()
            .filter(|path| {
                self.load_note(path)
                    .and_then(|doc| doc.frontmatter())
                    .ok()
                    .and_then(|fm| fm.get("aliases").cloned())
                    .is_some_and(|aliases| {
                        aliases.items().any(|alias| alias.to_lowercase() == query_lower)
                    })
            })
            .collect();
        single_match(query, by_alias)
    }
}

fn single_match(query: &str, mut matches: Vec<PathBuf>) -> Result<PathBuf> {
    match matches.len() {
        0 => Err(VaultError::NoteNotFound(PathBuf::from(query))),
        1 => Ok(matches.remove(0)),
        _ => Err(VaultError::AmbiguousNote {
            query: query.to_string(),
            matches,
        }),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn is_hidden(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}
