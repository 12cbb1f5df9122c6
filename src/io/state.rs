//! Persisted search results
//!
//! The most recent search is stored as a JSON object keyed by each result's
//! index. Every save replaces the file; modify and delete only read it. A
//! missing or corrupt file reads as an empty result set.

use crate::core::SearchResult;
use crate::error::{Result, VaultError};
use crate::io::writer::write_atomic;
use log::{debug, warn};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default state file location, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "storage/state.json";

/// State file holding the latest search results
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

/// Serializes results in their own order, keyed by index
struct IndexedResults<'a>(&'a [SearchResult]);

impl Serialize for IndexedResults<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for result in self.0 {
            map.serialize_entry(&result.id(), result)?;
        }
        map.end()
    }
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored results with `results`
    pub fn save(&self, results: &[SearchResult]) -> Result<()> {
        let json = serde_json::to_string_pretty(&IndexedResults(results))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, &json)?;

        debug!("Stored {} results in {}", results.len(), self.path.display());
        Ok(())
    }

    /// Load the stored results; absent or unparsable state is empty.
    pub fn load(&self) -> StoredResults {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No state at {}: {}", self.path.display(), e);
                return StoredResults::default();
            }
        };

        match serde_json::from_str::<BTreeMap<String, SearchResult>>(&content) {
            Ok(results) => StoredResults { results },
            Err(e) => {
                warn!("Ignoring unreadable state file {}: {}", self.path.display(), e);
                StoredResults::default()
            }
        }
    }

    /// Look up one stored result by its index
    pub fn lookup_by_index(&self, id: &str) -> Result<SearchResult> {
        self.load().lookup(id).cloned()
    }
}

/// Results loaded from the state file
#[derive(Debug, Clone, Default)]
pub struct StoredResults {
    results: BTreeMap<String, SearchResult>,
}

impl StoredResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Find a result by its index, as typed by the user
    pub fn lookup(&self, id: &str) -> Result<&SearchResult> {
        self.results
            .get(id.trim())
            .ok_or_else(|| VaultError::note_not_found(id))
    }

    /// Stored results ordered by index
    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        let mut results: Vec<&SearchResult> = self.results.values().collect();
        results.sort_by_key(|r| r.index);
        results.into_iter()
    }
}
