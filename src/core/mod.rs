//! Core note types and search logic
//!
//! This module holds everything that works on note content in memory:
//! - codec: the frontmatter block parser and serializer
//! - Frontmatter / FrontmatterValue: the ordered property mapping
//! - Document / Note: a note's content, and a note as seen by search
//! - SearchCriteria / MatchEvaluator: criteria and their evaluation
//! - SearchResult: the record persisted by the result store

pub mod codec;
pub mod criteria;
pub mod document;
pub mod front_matter;
pub mod matcher;
pub mod result;
pub mod value;

pub use criteria::{Category, Operator, PropertyValuePair, SearchCriteria};
pub use document::{Document, Note};
pub use front_matter::Frontmatter;
pub use matcher::{MatchEvaluator, MatchedParameters};
pub use result::SearchResult;
pub use value::FrontmatterValue;
