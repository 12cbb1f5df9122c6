//! Error types for the vaultnotes library
//!
//! Parsing and matching never fail: malformed frontmatter degrades to an empty
//! mapping and a non-matching note is simply skipped. The variants below cover
//! configuration, state-file lookups and the explicit writes done by the
//! modify/delete/create operations.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors (state file, JSON output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Vault root unset or not a directory
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Index not present in the stored search results
    #[error("Note with ID {id} not found in search results.")]
    NoteNotFound { id: String },

    /// The state file holds no results at all
    #[error("No search results found. Run a search first.")]
    NoResults,

    /// A stored note path no longer exists on disk
    #[error("Note file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Rebuilding or removing a note failed
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Template for note creation could not be located
    #[error("Template file not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// Malformed command input (e.g. a `name,value` pair without a comma)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VaultError>;

impl VaultError {
    /// Create a new configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a new note-not-found error
    pub fn note_not_found(id: impl Into<String>) -> Self {
        Self::NoteNotFound { id: id.into() }
    }

    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new write failure error
    pub fn write_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new template not found error
    pub fn template_not_found(path: impl Into<PathBuf>) -> Self {
        Self::TemplateNotFound { path: path.into() }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
