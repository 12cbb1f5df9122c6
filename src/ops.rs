//! Note operations driven by stored search results
//!
//! Modify and delete address notes by the indices of the latest search.
//! Modify keeps going when one ID fails and reports every failure; delete
//! resolves all IDs up front and refuses to remove anything when one of them
//! is unknown. Create and create-from-template write new notes into the vault.

use crate::config::VaultConfig;
use crate::core::{Document, Frontmatter, FrontmatterValue, PropertyValuePair, SearchResult};
use crate::error::{Result, VaultError};
use crate::io::scanner::{relative_path, NOTE_EXTENSION};
use crate::io::{NoteReader, NoteWriter, ResultStore};
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Outcome of a batch over several IDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BatchOutcome {
    fn from_errors(errors: Vec<VaultError>) -> Self {
        Self {
            success: errors.is_empty(),
            errors: errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Edits applied to each note by the modify operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyRequest {
    /// `name` → `value[,value...]`; several values make a list
    pub property_values: Vec<PropertyValuePair>,
    pub add_tags: Vec<String>,
    /// Replaces all tags with this single tag; `add_tags`/`remove_tags` are
    /// ignored when set
    pub set_tag: Option<String>,
    pub remove_tags: Vec<String>,
    /// Replaces the body
    pub content: Option<String>,
}

impl ModifyRequest {
    /// Apply the edits to a document in place
    pub fn apply(&self, document: &mut Document) {
        let fm = document.frontmatter_mut();

        for pair in &self.property_values {
            let items: Vec<String> = pair
                .value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            let value = match items.len() {
                0 => FrontmatterValue::string(""),
                1 => FrontmatterValue::String(items.into_iter().next().unwrap_or_default()),
                _ => FrontmatterValue::List(items),
            };
            fm.insert(pair.name.clone(), value);
        }

        match &self.set_tag {
            Some(tag) => {
                fm.insert("tags", FrontmatterValue::list([normalize_tag(tag)]));
            }
            None => {
                let mut list = fm
                    .get("tags")
                    .map(FrontmatterValue::to_list)
                    .unwrap_or_default();
                for tag in &self.add_tags {
                    let tag = normalize_tag(tag);
                    if !list.contains(&tag) {
                        list.push(tag);
                    }
                }
                for tag in &self.remove_tags {
                    let tag = normalize_tag(tag);
                    list.retain(|t| *t != tag);
                }
                // `insert` keeps an existing key in place
                if list.is_empty() {
                    fm.remove("tags");
                } else {
                    fm.insert("tags", FrontmatterValue::List(list));
                }
            }
        }

        if let Some(content) = &self.content {
            document.set_body(content.clone());
        }
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_string()
}

/// A note to create from scratch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    /// Directory relative to the vault root
    pub path: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Repeated names accumulate into a list
    pub property_values: Vec<PropertyValuePair>,
    pub content: Option<String>,
}

/// A note to create from a template file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateNote {
    /// Directory relative to the vault root
    pub path: String,
    pub title: String,
    /// Absolute, relative to the working directory, or relative to the vault
    pub template: PathBuf,
    /// `{{name}}` placeholders replaced by `value`
    pub replacements: Vec<PropertyValuePair>,
}

/// Where a new note was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedNote {
    #[serde(skip)]
    pub full_path: PathBuf,
    #[serde(rename = "path")]
    pub relative_path: String,
    pub slug: String,
}

/// Operations over the notes of one vault
#[derive(Debug, Clone)]
pub struct NoteOperations {
    config: VaultConfig,
    store: ResultStore,
    reader: NoteReader,
    writer: NoteWriter,
}

impl NoteOperations {
    pub fn new(config: VaultConfig) -> Self {
        let store = ResultStore::new(config.state_file());
        Self {
            config,
            store,
            reader: NoteReader::new(),
            writer: NoteWriter::new(),
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Modify every ID, collecting failures instead of stopping at the first
    pub fn modify(&self, ids: &[String], request: &ModifyRequest) -> Result<BatchOutcome> {
        let stored = self.store.load();
        if stored.is_empty() {
            return Err(VaultError::NoResults);
        }

        let mut errors = Vec::new();
        for id in ids {
            let outcome = stored
                .lookup(id)
                .and_then(|result| self.modify_note(result, request));
            if let Err(e) = outcome {
                debug!("Modify failed for ID {}: {}", id, e);
                errors.push(e);
            }
        }

        Ok(BatchOutcome::from_errors(errors))
    }

    fn modify_note(&self, result: &SearchResult, request: &ModifyRequest) -> Result<()> {
        if !result.full_path.is_file() {
            return Err(VaultError::file_not_found(&result.full_path));
        }
        let mut document = self.reader.read_document(&result.full_path)?;
        request.apply(&mut document);
        let written = self.writer.write_document(&document, &result.full_path)?;
        if written.modified {
            info!("Modified: {}", result.relative_path);
        }
        Ok(())
    }

    /// Resolve every ID before anything is deleted; the first unknown ID fails
    /// the whole batch.
    pub fn resolve_for_delete(&self, ids: &[String]) -> Result<Vec<SearchResult>> {
        let stored = self.store.load();
        if stored.is_empty() {
            return Err(VaultError::NoResults);
        }
        ids.iter()
            .map(|id| stored.lookup(id).cloned())
            .collect()
    }

    /// Delete resolved notes, collecting per-note failures
    pub fn delete(&self, targets: &[SearchResult]) -> BatchOutcome {
        let mut errors = Vec::new();
        for target in targets {
            match self.writer.remove_note(&target.full_path) {
                Ok(()) => info!("Deleted: {}", target.relative_path),
                Err(VaultError::FileNotFound { .. }) => {
                    errors.push(VaultError::file_not_found(&target.relative_path));
                }
                Err(e) => errors.push(e),
            }
        }
        BatchOutcome::from_errors(errors)
    }

    /// Create a note named after its title in `note.path`
    pub fn create(&self, note: &NewNote) -> Result<CreatedNote> {
        let stem = sanitize_file_stem(&note.title);
        if stem.is_empty() {
            return Err(VaultError::invalid_argument("note title must not be empty"));
        }

        let mut fm = Frontmatter::new();
        fm.insert("title", note.title.clone());
        if !note.tags.is_empty() {
            fm.insert(
                "tags",
                FrontmatterValue::List(note.tags.iter().map(|t| normalize_tag(t)).collect()),
            );
        }
        for pair in &note.property_values {
            accumulate_property(&mut fm, pair);
        }

        let document = Document::new(fm, note.content.clone().unwrap_or_default());
        self.write_new(&note.path, &stem, &document)
    }

    /// Create a note from a template, replacing `{{name}}` placeholders
    pub fn create_from_template(&self, note: &TemplateNote) -> Result<CreatedNote> {
        let template_path = self.resolve_template(&note.template)?;
        let mut document = self.reader.read_document(&template_path)?;

        for pair in &note.replacements {
            apply_replacement(&mut document, &format!("{{{{{}}}}}", pair.name), &pair.value);
        }

        if !note.title.is_empty() {
            document.frontmatter_mut().insert("title", note.title.clone());
        }
        let title = document
            .frontmatter()
            .get("title")
            .map(FrontmatterValue::to_normalized_string)
            .unwrap_or_else(|| note.title.clone());

        let mut slug = slugify(&title);
        if slug.is_empty() {
            slug = "untitled".to_string();
        }
        self.write_new(&note.path, &slug, &document)
    }

    fn resolve_template(&self, template: &Path) -> Result<PathBuf> {
        let relative = vault_relative(template)?;
        if template.is_file() {
            return Ok(template.to_path_buf());
        }
        let in_vault = self.config.vault_root().join(relative);
        if in_vault.is_file() {
            Ok(in_vault)
        } else {
            Err(VaultError::template_not_found(in_vault))
        }
    }

    fn write_new(&self, dir: &str, stem: &str, document: &Document) -> Result<CreatedNote> {
        let target_dir = self.config.vault_root().join(vault_relative(Path::new(dir))?);
        let slug = find_available_filename(&target_dir, stem);
        let full_path = target_dir.join(format!("{slug}.{NOTE_EXTENSION}"));

        self.writer
            .write_string(&full_path, &document.render())
            .map_err(|e| match e {
                VaultError::WriteFailed { .. } => e,
                other => VaultError::write_failed(&full_path, other.to_string()),
            })?;

        let relative_path = relative_path(self.config.vault_root(), &full_path)
            .unwrap_or_else(|| full_path.to_string_lossy().into_owned());
        info!("Note created: {}", relative_path);

        Ok(CreatedNote {
            full_path,
            relative_path,
            slug,
        })
    }
}

/// `path` with any root stripped, rejected if it climbs out with `..`
fn vault_relative(path: &Path) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                return Err(VaultError::invalid_argument(format!(
                    "path must stay inside the vault: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(relative)
}

/// Add a property value, turning repeated names into a de-duplicated list
fn accumulate_property(fm: &mut Frontmatter, pair: &PropertyValuePair) {
    match fm.get_mut(&pair.name) {
        Some(existing) => {
            let mut items = existing.to_list();
            if !items.contains(&pair.value) {
                items.push(pair.value.clone());
            }
            *existing = FrontmatterValue::List(items);
        }
        None => {
            fm.insert(pair.name.clone(), pair.value.clone());
        }
    }
}

fn apply_replacement(document: &mut Document, placeholder: &str, value: &str) {
    for (_, v) in document.frontmatter_mut().iter_mut() {
        match v {
            FrontmatterValue::String(s) => *s = s.replace(placeholder, value),
            FrontmatterValue::List(items) => {
                for item in items.iter_mut() {
                    *item = item.replace(placeholder, value);
                }
            }
            FrontmatterValue::Bool(_) => {}
        }
    }
    let body = document.body().replace(placeholder, value);
    document.set_body(body);
}

fn sanitize_file_stem(title: &str) -> String {
    title.trim().replace(['/', '\\'], "-")
}

fn slug_separator_re() -> &'static Regex {
    static SLUG_RE: OnceLock<Regex> = OnceLock::new();
    SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"))
}

/// Lowercase, runs of anything outside `[a-z0-9]` collapsed to `-`
pub fn slugify(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    slug_separator_re()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// `stem` if `dir/stem.md` is free, otherwise the first free `stem-N`
pub fn find_available_filename(dir: &Path, stem: &str) -> String {
    let taken = |name: &str| dir.join(format!("{name}.{NOTE_EXTENSION}")).exists();
    if !taken(stem) {
        return stem.to_string();
    }
    (1..)
        .map(|counter| format!("{stem}-{counter}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| stem.to_string())
}
