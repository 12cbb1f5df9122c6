//! Search results
//!
//! A [`SearchResult`] is the record persisted in the state file. Its `index`
//! is only meaningful until the next search overwrites the store.

use crate::core::front_matter::Frontmatter;
use crate::core::matcher::MatchedParameters;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One matched note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub index: usize,
    pub full_path: PathBuf,
    pub relative_path: String,
    pub title: String,
    /// `YYYY-MM-DD`, compared chronologically
    pub last_modification_date: Option<NaiveDate>,
    pub matched_parameters: MatchedParameters,
    #[serde(default, skip_serializing_if = "Frontmatter::is_empty")]
    pub frontmatter: Frontmatter,
}

impl SearchResult {
    /// Key under which this result is stored
    pub fn id(&self) -> String {
        self.index.to_string()
    }

    /// Title for display, with a placeholder when empty
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(no title)"
        } else {
            &self.title
        }
    }

    /// Modification date for display
    pub fn display_date(&self) -> String {
        self.last_modification_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}
