//! vaultnotes: search and batch-edit a vault of markdown notes
//!
//! A vault is a directory tree of `.md` files, each optionally opening with a
//! frontmatter block of properties. This library scans the vault, evaluates
//! search criteria against each note, and remembers the latest results so
//! that follow-up operations can address notes by their result index.
//!
//! # Quick Start
//!
//! ## Searching
//!
//! ```rust,no_run
//! use vaultnotes::{Operator, SearchCriteria, SearchOrchestrator, SearchRequest, VaultConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let config = VaultConfig::new("/path/to/vault");
//!     let orchestrator = SearchOrchestrator::new(config)?;
//!
//!     let criteria = SearchCriteria::new()
//!         .with_tag("project")
//!         .with_property_value("status", "active")
//!         .without_path_contains("archive");
//!     let request = SearchRequest::new(criteria).with_operator(Operator::And);
//!
//!     for result in orchestrator.search(&request)? {
//!         println!("{}: {}", result.index, result.display_title());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modifying by index
//!
//! ```rust,no_run
//! use vaultnotes::{ModifyRequest, NoteOperations, VaultConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let ops = NoteOperations::new(VaultConfig::new("/path/to/vault"));
//!     let request = ModifyRequest {
//!         add_tags: vec!["reviewed".to_string()],
//!         ..Default::default()
//!     };
//!     let outcome = ops.modify(&["0".to_string(), "2".to_string()], &request)?;
//!     for error in &outcome.errors {
//!         eprintln!("{error}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing frontmatter
//!
//! ```rust
//! use vaultnotes::{Document, FrontmatterValue};
//!
//! let doc = Document::parse("---\ntitle: Hello\ntags: [a, b]\n---\nBody");
//! assert_eq!(doc.frontmatter().get("title").and_then(FrontmatterValue::as_str), Some("Hello"));
//! assert_eq!(doc.body(), "Body");
//! ```
//!
//! # Architecture
//!
//! - [`core`]: frontmatter codec, criteria, match evaluation and result types
//! - [`io`]: vault scanning, note reading/writing and the result store
//! - [`search`]: the search pipeline and its date and recency post-filters
//! - [`ops`]: modify, delete and create operations
//! - [`config`]: vault root and state file resolution
//! - [`error`]: the error type shared by all of the above

// Public API exports
pub use config::VaultConfig;
pub use error::{Result, VaultError};

// Core types
pub use core::{
    Category, Document, Frontmatter, FrontmatterValue, MatchEvaluator, MatchedParameters, Note,
    Operator, PropertyValuePair, SearchCriteria, SearchResult,
};

// IO types
pub use io::{
    NoteReader, NoteWriter, ReaderConfig, ResultStore, ScannedFile, ScannerConfig,
    StoredResults, VaultScanner, WriteResult, WriterConfig,
};

pub use ops::{BatchOutcome, CreatedNote, ModifyRequest, NewNote, NoteOperations, TemplateNote};
pub use search::{SearchOrchestrator, SearchRequest};

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod ops;
pub mod search;

// CLI components are available only in the binary, not as part of the library API
