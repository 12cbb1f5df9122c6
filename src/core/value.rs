//! Core value types for frontmatter handling
//!
//! Frontmatter values are inferred once at parse time from the shape of the
//! raw text and carried around as an explicit discriminated type. Numbers are
//! kept as strings; nested mappings are not supported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed frontmatter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    String(String),
    Bool(bool),
    List(Vec<String>),
}

impl FrontmatterValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create a list value
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Check if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Check if this value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Check if this value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Try to convert to string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to convert to list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Scalar form used for value comparisons: booleans become `true`/`false`,
    /// lists are joined with `, `.
    pub fn to_normalized_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items.join(", "),
        }
    }

    /// Coerce to a list: scalars become a single-item list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::String(s) => vec![s],
            Self::Bool(b) => vec![b.to_string()],
        }
    }

    /// Same as [`into_list`](Self::into_list) without consuming the value
    pub fn to_list(&self) -> Vec<String> {
        self.clone().into_list()
    }
}

impl fmt::Display for FrontmatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            other => write!(f, "{}", other.to_normalized_string()),
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FrontmatterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FrontmatterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for FrontmatterValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}
