//! Search criteria
//!
//! Criteria are grouped into positive categories, combined by an
//! [`Operator`], and exclusion categories, where any single hit rejects the
//! note. A category takes part in a search only when its list is non-empty.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How positive categories are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Every requested category must match
    #[default]
    And,
    /// At least one requested category must match
    Or,
}

impl FromStr for Operator {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(VaultError::invalid_argument(format!(
                "unknown operator '{other}', expected AND or OR"
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Positive criterion categories, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Path,
    PathContains,
    Tags,
    Properties,
    PropertyValue,
    Title,
    Content,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Path,
        Category::PathContains,
        Category::Tags,
        Category::Properties,
        Category::PropertyValue,
        Category::Title,
        Category::Content,
    ];

    /// Name used in matched parameters and the state file
    pub fn name(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::PathContains => "pathContains",
            Self::Tags => "tags",
            Self::Properties => "properties",
            Self::PropertyValue => "propertyValue",
            Self::Title => "title",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `name,value` pair for property value criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValuePair {
    pub name: String,
    pub value: String,
}

impl PropertyValuePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl FromStr for PropertyValuePair {
    type Err = VaultError;

    /// Parse `name,value`; only the first comma separates, both parts are trimmed.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(',') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok(Self::new(name.trim(), value.trim()))
            }
            _ => Err(VaultError::invalid_argument(format!(
                "expected 'name,value', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for PropertyValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The full set of search criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub path: Vec<String>,
    pub path_contains: Vec<String>,
    pub tags: Vec<String>,
    pub properties: Vec<String>,
    pub property_values: Vec<PropertyValuePair>,
    pub title: Vec<String>,
    pub content: Vec<String>,

    pub without_path_contains: Vec<String>,
    pub without_tags: Vec<String>,
    pub without_properties: Vec<String>,
    pub without_property_values: Vec<PropertyValuePair>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, value: impl Into<String>) -> Self {
        self.path.push(value.into());
        self
    }

    pub fn with_path_contains(mut self, value: impl Into<String>) -> Self {
        self.path_contains.push(value.into());
        self
    }

    pub fn with_tag(mut self, value: impl Into<String>) -> Self {
        self.tags.push(value.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    pub fn with_property_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.property_values.push(PropertyValuePair::new(name, value));
        self
    }

    pub fn with_title(mut self, value: impl Into<String>) -> Self {
        self.title.push(value.into());
        self
    }

    pub fn with_content(mut self, value: impl Into<String>) -> Self {
        self.content.push(value.into());
        self
    }

    pub fn without_path_contains(mut self, value: impl Into<String>) -> Self {
        self.without_path_contains.push(value.into());
        self
    }

    pub fn without_tag(mut self, value: impl Into<String>) -> Self {
        self.without_tags.push(value.into());
        self
    }

    pub fn without_property(mut self, name: impl Into<String>) -> Self {
        self.without_properties.push(name.into());
        self
    }

    pub fn without_property_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.without_property_values
            .push(PropertyValuePair::new(name, value));
        self
    }

    /// Drop empty strings from every list, the way blank CLI values are ignored
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.path,
            &mut self.path_contains,
            &mut self.tags,
            &mut self.properties,
            &mut self.title,
            &mut self.content,
            &mut self.without_path_contains,
            &mut self.without_tags,
            &mut self.without_properties,
        ] {
            list.retain(|v| !v.is_empty());
        }
        self
    }

    /// Positive categories that take part in this search
    pub fn positive_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_present(*c))
            .collect()
    }

    pub fn is_present(&self, category: Category) -> bool {
        match category {
            Category::Path => !self.path.is_empty(),
            Category::PathContains => !self.path_contains.is_empty(),
            Category::Tags => !self.tags.is_empty(),
            Category::Properties => !self.properties.is_empty(),
            Category::PropertyValue => !self.property_values.is_empty(),
            Category::Title => !self.title.is_empty(),
            Category::Content => !self.content.is_empty(),
        }
    }

    pub fn has_positive(&self) -> bool {
        Category::ALL.into_iter().any(|c| self.is_present(c))
    }

    pub fn has_exclusions(&self) -> bool {
        !self.without_path_contains.is_empty()
            || !self.without_tags.is_empty()
            || !self.without_properties.is_empty()
            || !self.without_property_values.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_positive() && !self.has_exclusions()
    }
}
