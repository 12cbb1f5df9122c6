//! Search orchestration
//!
//! Wires the scanner, reader and match evaluator together, applies the date
//! and "last N" post-filters, and persists the outcome to the result store.
//!
//! ```rust,no_run
//! use vaultnotes::{SearchCriteria, SearchOrchestrator, SearchRequest, VaultConfig};
//!
//! fn main() -> vaultnotes::Result<()> {
//!     let orchestrator = SearchOrchestrator::new(VaultConfig::new("/path/to/vault"))?;
//!     let request = SearchRequest::new(SearchCriteria::new().with_tag("project"));
//!     for result in orchestrator.search(&request)? {
//!         println!("{} {}", result.index, result.relative_path);
//!     }
//!     Ok(())
//! }
//! ```

use crate::config::VaultConfig;
use crate::core::{MatchEvaluator, Operator, SearchCriteria, SearchResult};
use crate::error::Result;
use crate::io::{NoteReader, ResultStore, VaultScanner};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// A complete search invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub criteria: SearchCriteria,
    pub operator: Operator,
    /// Keep results modified on or before this date
    pub modified_before: Option<NaiveDate>,
    /// Keep results modified on or after this date
    pub modified_after: Option<NaiveDate>,
    /// Keep only the N most recently modified results
    pub last: Option<usize>,
}

impl SearchRequest {
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            ..Default::default()
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn modified_between(mut self, after: Option<NaiveDate>, before: Option<NaiveDate>) -> Self {
        self.modified_after = after;
        self.modified_before = before;
        self
    }

    pub fn with_last(mut self, n: usize) -> Self {
        self.last = Some(n);
        self
    }
}

/// Entry point for searches over one vault
#[derive(Debug, Clone)]
pub struct SearchOrchestrator {
    scanner: VaultScanner,
    reader: NoteReader,
    store: ResultStore,
}

impl SearchOrchestrator {
    /// Fails with a configuration error when the vault root is not a directory.
    pub fn new(config: VaultConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scanner: VaultScanner::new(config.vault_root()),
            reader: NoteReader::new(),
            store: ResultStore::new(config.state_file()),
        })
    }

    pub fn with_parts(scanner: VaultScanner, reader: NoteReader, store: ResultStore) -> Self {
        Self {
            scanner,
            reader,
            store,
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Run the search and overwrite the result store with its outcome
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let results = self.find(request);
        self.store.save(&results)?;
        Ok(results)
    }

    /// Run the search without touching the result store
    pub fn find(&self, request: &SearchRequest) -> Vec<SearchResult> {
        if request.criteria.is_empty() {
            info!("No search criteria provided, listing every note");
        }
        let evaluator = MatchEvaluator::new(request.criteria.clone(), request.operator);

        let mut results = Vec::new();
        for file in self.scanner.scan() {
            let note = match self.reader.read_note(&file) {
                Ok(note) => note,
                Err(e) => {
                    warn!("Skipping {}: {}", file.relative_path, e);
                    continue;
                }
            };

            if let Some(matched_parameters) = evaluator.evaluate(&note) {
                debug!("Matched {}", note.relative_path);
                results.push(SearchResult {
                    index: results.len(),
                    full_path: note.full_path,
                    relative_path: note.relative_path,
                    title: note.title,
                    last_modification_date: note.last_modified,
                    matched_parameters,
                    frontmatter: note.frontmatter,
                });
            }
        }

        let mut results =
            filter_by_modification_date(results, request.modified_after, request.modified_before);
        if let Some(n) = request.last {
            results = filter_last_n(results, n);
        }

        info!("{} notes matched", results.len());
        results
    }
}

/// Keep results whose date lies in the inclusive `[after, before]` range.
/// Results without a date are dropped as soon as either bound is set.
pub fn filter_by_modification_date(
    results: Vec<SearchResult>,
    after: Option<NaiveDate>,
    before: Option<NaiveDate>,
) -> Vec<SearchResult> {
    if after.is_none() && before.is_none() {
        return results;
    }

    results
        .into_iter()
        .filter(|r| match r.last_modification_date {
            Some(date) => {
                before.map_or(true, |b| date <= b) && after.map_or(true, |a| date >= a)
            }
            None => false,
        })
        .collect()
}

/// Keep the `n` most recently modified results, newest first. Missing dates
/// sort as the oldest; equal dates are ordered by relative path.
pub fn filter_last_n(mut results: Vec<SearchResult>, n: usize) -> Vec<SearchResult> {
    if n == 0 {
        return Vec::new();
    }

    results.sort_by(|a, b| {
        let date_a = a.last_modification_date.unwrap_or(NaiveDate::MIN);
        let date_b = b.last_modification_date.unwrap_or(NaiveDate::MIN);
        date_b
            .cmp(&date_a)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });
    results.truncate(n);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchedParameters;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn dated(index: usize, rel: &str, date: Option<&str>) -> SearchResult {
        SearchResult {
            index,
            full_path: PathBuf::from("/vault").join(rel),
            relative_path: rel.to_string(),
            title: rel.to_string(),
            last_modification_date: date.map(|d| d.parse().unwrap()),
            matched_parameters: MatchedParameters::path_only(rel),
            frontmatter: Default::default(),
        }
    }

    fn day(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    fn five_notes() -> Vec<SearchResult> {
        (1..=5)
            .map(|i| dated(i - 1, &format!("n{i}.md"), Some(&format!("2024-01-0{i}"))))
            .collect()
    }

    #[test]
    fn test_last_n_newest_first() {
        let last = filter_last_n(five_notes(), 2);
        let dates: Vec<String> = last.iter().map(|r| r.display_date()).collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-01-04"]);
        assert_eq!(last[0].index, 4);
    }

    #[test]
    fn test_last_n_ties_and_missing_dates() {
        let results = vec![
            dated(0, "b.md", Some("2024-02-01")),
            dated(1, "none.md", None),
            dated(2, "a.md", Some("2024-02-01")),
        ];
        let paths: Vec<String> = filter_last_n(results, 10)
            .into_iter()
            .map(|r| r.relative_path)
            .collect();
        assert_eq!(paths, vec!["a.md", "b.md", "none.md"]);
    }

    #[test]
    fn test_last_zero_is_empty() {
        assert!(filter_last_n(five_notes(), 0).is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let kept = filter_by_modification_date(five_notes(), day("2024-01-02"), day("2024-01-04"));
        let indices: Vec<usize> = kept.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_date_range_drops_undated() {
        let mut results = five_notes();
        results.push(dated(5, "undated.md", None));

        assert_eq!(filter_by_modification_date(results.clone(), None, None).len(), 6);
        assert_eq!(
            filter_by_modification_date(results, None, day("2030-01-01")).len(),
            5
        );
    }
}
