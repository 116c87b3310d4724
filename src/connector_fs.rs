//! Source document discovery.
//!
//! Walks a docs directory recursively and keeps plain-text and Markdown
//! files (`.txt`, `.md`, `.markdown`, any case). Results are sorted by
//! relative path so that re-indexing the same tree assigns the same ids.

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const INCLUDE_GLOBS: &[&str] = &["**/*.txt", "**/*.md", "**/*.markdown"];

/// A discovered document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub path: PathBuf,
    /// Path relative to the docs directory, used for ordering.
    pub relative_path: String,
    /// Label recorded on every chunk of this file (its file name).
    pub source: String,
}

impl DocumentFile {
    /// Read the file as UTF-8, replacing invalid sequences.
    pub fn read_text(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// List every indexable document under `root`.
pub fn discover_documents(root: &Path) -> Result<Vec<DocumentFile>> {
    if !root.is_dir() {
        bail!("Docs directory not found: {}", root.display());
    }

    let include_set = build_globset(INCLUDE_GLOBS)?;
    let mut docs = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if !include_set.is_match(&rel_str) {
            continue;
        }

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| rel_str.clone());

        docs.push(DocumentFile {
            path: path.to_path_buf(),
            relative_path: rel_str,
            source,
        });
    }

    // Sort for deterministic ordering
    docs.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    tracing::debug!(root = %root.display(), documents = docs.len(), "discovered documents");
    Ok(docs)
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).case_insensitive(true).build()?);
    }
    Ok(builder.build()?)
}
