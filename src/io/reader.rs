//! Note reading
//!
//! Loads a file from disk into a [`Document`] or a [`Note`] carrying its
//! derived title and last modification date.

use crate::core::{Document, Note};
use crate::error::{Result, VaultError};
use crate::io::scanner::ScannedFile;
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::path::Path;

/// Configuration for the note reader
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes); unlimited when `None`
    pub max_file_size: Option<u64>,
}

/// Reads note files
#[derive(Debug, Clone, Default)]
pub struct NoteReader {
    config: ReaderConfig,
}

impl NoteReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read and parse a document. Missing files and size violations are
    /// errors; malformed frontmatter is not.
    pub fn read_document<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let content = self.read_content(path.as_ref())?;
        Ok(Document::parse(&content))
    }

    /// Read a scanned file into a note
    pub fn read_note(&self, file: &ScannedFile) -> Result<Note> {
        let content = self.read_content(&file.full_path)?;
        let last_modified = modification_date(&file.full_path);
        Ok(Note::new(
            file.full_path.clone(),
            file.relative_path.clone(),
            Document::parse(&content),
            last_modified,
        ))
    }

    fn read_content(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(VaultError::file_not_found(path));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path)?;
            if metadata.len() > max_size {
                return Err(VaultError::invalid_argument(format!(
                    "File too large: {} ({} bytes, limit {} bytes)",
                    path.display(),
                    metadata.len(),
                    max_size
                )));
            }
        }

        Ok(fs::read_to_string(path)?)
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

/// Local calendar date of the file's last modification
pub fn modification_date(path: &Path) -> Option<NaiveDate> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.date_naive())
}
