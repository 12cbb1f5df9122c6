//! Note documents: frontmatter plus body
//!
//! [`Document`] is the editable form of a note's content used by the modify
//! and create operations. [`Note`] is the read-only view built for every file
//! during a search and discarded after matching.

use crate::core::codec;
use crate::core::front_matter::Frontmatter;
use crate::core::value::FrontmatterValue;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A markdown document with frontmatter and body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    frontmatter: Frontmatter,
    body: String,
}

impl Document {
    pub fn new(frontmatter: Frontmatter, body: impl Into<String>) -> Self {
        Self {
            frontmatter,
            body: body.into(),
        }
    }

    /// Parse raw note content
    pub fn parse(content: &str) -> Self {
        let (frontmatter, body) = codec::parse(content);
        Self { frontmatter, body }
    }

    /// Render the document back into note content
    pub fn render(&self) -> String {
        let mut out = codec::serialize(&self.frontmatter);
        out.push_str(&self.body);
        out
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    pub fn frontmatter_mut(&mut self) -> &mut Frontmatter {
        &mut self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn has_frontmatter(&self) -> bool {
        !self.frontmatter.is_empty()
    }

    pub fn into_parts(self) -> (Frontmatter, String) {
        (self.frontmatter, self.body)
    }
}

/// A note as seen by the search engine
#[derive(Debug, Clone)]
pub struct Note {
    pub full_path: PathBuf,
    /// Path relative to the vault root, `/`-separated
    pub relative_path: String,
    pub frontmatter: Frontmatter,
    pub body: String,
    pub title: String,
    pub last_modified: Option<NaiveDate>,
}

impl Note {
    /// Build a note from its parsed document. The title comes from the
    /// `title` property when it is a non-empty string, otherwise from the
    /// file name without extension.
    pub fn new(
        full_path: PathBuf,
        relative_path: String,
        document: Document,
        last_modified: Option<NaiveDate>,
    ) -> Self {
        let (frontmatter, body) = document.into_parts();
        let title = derive_title(&frontmatter, &relative_path);
        Self {
            full_path,
            relative_path,
            frontmatter,
            body,
            title,
            last_modified,
        }
    }

    pub fn tags(&self) -> Vec<String> {
        self.frontmatter
            .get("tags")
            .map(FrontmatterValue::to_list)
            .unwrap_or_default()
    }
}

fn derive_title(frontmatter: &Frontmatter, relative_path: &str) -> String {
    if let Some(title) = frontmatter.get("title").and_then(FrontmatterValue::as_str) {
        if !title.trim().is_empty() {
            return title.to_string();
        }
    }
    title_from_path(relative_path)
}

/// File name without its extension
pub fn title_from_path(relative_path: &str) -> String {
    Path::new(relative_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
