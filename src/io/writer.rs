//! Note writing and removal
//!
//! Documents are rendered with the frontmatter codec and written through a
//! temporary file in the target directory that is then renamed over the
//! destination, so readers never observe a half-written note.

use crate::core::Document;
use crate::error::{Result, VaultError};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Configuration for the note writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Use atomic writes (write to temp file first, then rename)
    pub atomic_writes: bool,
    /// Create missing parent directories
    pub create_dirs: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
            create_dirs: true,
        }
    }
}

/// Result of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Whether the file content changed
    pub modified: bool,
    pub path: PathBuf,
}

/// Writes and removes note files
#[derive(Debug, Clone, Default)]
pub struct NoteWriter {
    config: WriterConfig,
}

impl NoteWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new writer with custom configuration
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Render `document` and write it to `path`
    pub fn write_document<P: AsRef<Path>>(&self, document: &Document, path: P) -> Result<WriteResult> {
        let path = path.as_ref();
        let content = document.render();

        let modified = match fs::read_to_string(path) {
            Ok(original) => original != content,
            Err(_) => true,
        };
        if !modified {
            debug!("Unchanged: {}", path.display());
            return Ok(WriteResult {
                modified,
                path: path.to_path_buf(),
            });
        }

        self.write_string(path, &content)?;
        Ok(WriteResult {
            modified,
            path: path.to_path_buf(),
        })
    }

    /// Write raw content to `path`
    pub fn write_string(&self, path: &Path, content: &str) -> Result<()> {
        if self.config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| VaultError::write_failed(path, e.to_string()))?;
            }
        }

        if self.config.atomic_writes {
            write_atomic(path, content)
        } else {
            fs::write(path, content).map_err(|e| VaultError::write_failed(path, e.to_string()))
        }
    }

    /// Delete a note file
    pub fn remove_note(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(VaultError::file_not_found(path));
        }
        fs::remove_file(path).map_err(|e| VaultError::write_failed(path, e.to_string()))
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

/// Write file atomically using a temporary file in the same directory.
///
/// An existing destination is resolved through symlinks first and its
/// permissions are carried over to the replacement.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(real) => real,
        Err(_) => path.to_path_buf(),
    };
    let existing_permissions = fs::metadata(&target).ok().map(|m| m.permissions());

    let parent_dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| VaultError::write_failed(path, e.to_string()))?;

    temp_file
        .write_all(content.as_bytes())
        .and_then(|_| temp_file.flush())
        .map_err(|e| VaultError::write_failed(path, e.to_string()))?;

    if let Some(permissions) = existing_permissions {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| VaultError::write_failed(path, e.to_string()))?;
    }

    temp_file
        .persist(&target)
        .map_err(|e| VaultError::write_failed(path, e.error.to_string()))?;

    Ok(())
}
