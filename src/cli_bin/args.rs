//! Command-line argument definitions and parsing
//!
//! Arguments are parsed straight into library types where one exists
//! (`Operator`, `PropertyValuePair`, `NaiveDate`), so malformed input is
//! rejected by clap before any command runs.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vaultnotes::{Operator, PropertyValuePair, SearchCriteria};

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "vaultnotes",
    version,
    about = "Search and batch-edit a vault of markdown notes",
    long_about = "vaultnotes searches a vault of markdown notes by path, tags, frontmatter \
                  properties, title and content. Results are numbered and remembered, so \
                  that modify and delete can address notes by their result ID. The vault \
                  root is read from VAULT_PATH (a .env file in the working directory is \
                  honoured)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log errors only; command output is still printed
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the vault and remember the results
    Search(SearchArgs),
    /// Modify notes from the last search by ID
    Modify(ModifyArgs),
    /// Delete notes from the last search by ID
    Delete(DeleteArgs),
    /// Create a new note
    Create(CreateArgs),
    /// Create a new note from a template
    CreateFromTemplate(CreateFromTemplateArgs),
}

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// How criteria categories are combined
    #[arg(long, default_value = "AND", value_name = "AND|OR")]
    pub operator: Operator,

    /// Exact relative path of a note
    #[arg(long, value_name = "PATH")]
    pub path: Vec<String>,

    /// Substring of the relative path
    #[arg(long, value_name = "TEXT")]
    pub path_contains: Vec<String>,

    /// Exclude notes whose path contains this substring
    #[arg(long, value_name = "TEXT")]
    pub without_path_contains: Vec<String>,

    /// Tag the note must carry (a leading # is ignored)
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Exclude notes carrying this tag
    #[arg(long, value_name = "TAG")]
    pub without_tag: Vec<String>,

    /// Property the note must define
    #[arg(long, value_name = "NAME")]
    pub property: Vec<String>,

    /// Exclude notes defining this property
    #[arg(long, value_name = "NAME")]
    pub without_property: Vec<String>,

    /// Property value the note must have
    #[arg(long, value_name = "NAME,VALUE")]
    pub property_value: Vec<PropertyValuePair>,

    /// Exclude notes having this property value
    #[arg(long, value_name = "NAME,VALUE")]
    pub without_property_value: Vec<PropertyValuePair>,

    /// Case-insensitive substring of the title
    #[arg(long, value_name = "TEXT")]
    pub title: Vec<String>,

    /// Case-insensitive substring of the body
    #[arg(long, value_name = "TEXT")]
    pub content: Vec<String>,

    /// Keep notes modified on or before this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub modified_before: Option<NaiveDate>,

    /// Keep notes modified on or after this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub modified_after: Option<NaiveDate>,

    /// Keep only the N most recently modified notes
    #[arg(long, value_name = "N")]
    pub last: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    /// Criteria described by these arguments
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            path: self.path.clone(),
            path_contains: self.path_contains.clone(),
            tags: self.tag.clone(),
            properties: self.property.clone(),
            property_values: self.property_value.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            without_path_contains: self.without_path_contains.clone(),
            without_tags: self.without_tag.clone(),
            without_properties: self.without_property.clone(),
            without_property_values: self.without_property_value.clone(),
        }
        .normalized()
    }
}

/// Arguments for the modify command
#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// Result IDs from the last search
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<String>,

    /// Set a property; several comma-separated values make a list
    #[arg(long, value_name = "NAME,VALUE[,VALUE...]")]
    pub property_value: Vec<PropertyValuePair>,

    /// Add a tag
    #[arg(long, value_name = "TAG")]
    pub add_tag: Vec<String>,

    /// Replace all tags with this one
    #[arg(long, value_name = "TAG", conflicts_with_all = ["add_tag", "remove_tag"])]
    pub set_tag: Option<String>,

    /// Remove a tag
    #[arg(long, value_name = "TAG")]
    pub remove_tag: Vec<String>,

    /// Replace the note body
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Result IDs from the last search
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<String>,

    /// Delete without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory relative to the vault root
    pub path: String,

    /// Note title, also used as the file name
    pub title: String,

    /// Tag to add
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Property value; repeating a name builds a list
    #[arg(long, value_name = "NAME,VALUE")]
    pub property_value: Vec<PropertyValuePair>,

    /// Note body
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,
}

/// Arguments for the create-from-template command
#[derive(Args, Debug)]
pub struct CreateFromTemplateArgs {
    /// Directory relative to the vault root
    pub path: String,

    /// Note title
    pub title: String,

    /// Template file, as given or relative to the vault root
    pub template: PathBuf,

    /// Replace {{NAME}} with VALUE
    #[arg(long, value_name = "NAME,VALUE")]
    pub replace: Vec<PropertyValuePair>,

    /// Print the created note as JSON
    #[arg(long)]
    pub json: bool,
}
