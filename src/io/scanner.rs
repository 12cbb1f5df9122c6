//! Vault traversal
//!
//! Walks the vault recursively, following symbolic links and skipping hidden
//! entries, and yields every note file with its vault-relative path.

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Note file extension, compared case-insensitively
pub const NOTE_EXTENSION: &str = "md";

/// A note file found in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub full_path: PathBuf,
    /// Path relative to the vault root, `/`-separated
    pub relative_path: String,
}

/// Configuration for the vault scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Include hidden files and directories (starting with .)
    pub include_hidden: bool,
    /// Maximum recursion depth
    pub max_depth: Option<usize>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
            max_depth: None,
        }
    }
}

/// Recursive note enumerator rooted at a vault directory
#[derive(Debug, Clone)]
pub struct VaultScanner {
    root: PathBuf,
    config: ScannerConfig,
}

impl VaultScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, ScannerConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: ScannerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate note files. Entries that cannot be read are skipped. Within a
    /// directory entries are visited by file name, but callers should not
    /// depend on any particular order.
    pub fn scan(&self) -> Vec<ScannedFile> {
        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| e.depth() == 0 || include_hidden || !is_hidden(e));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_note_file(entry.path()) {
                continue;
            }

            match relative_path(&self.root, entry.path()) {
                Some(relative_path) => files.push(ScannedFile {
                    full_path: entry.path().to_path_buf(),
                    relative_path,
                }),
                None => debug!("Skipping path outside vault: {}", entry.path().display()),
            }
        }

        debug!("Found {} notes under {}", files.len(), self.root.display());
        files
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Check if a path has the note extension
pub fn is_note_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(NOTE_EXTENSION))
        .unwrap_or(false)
}

/// Vault-relative, `/`-separated form of `path`
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
