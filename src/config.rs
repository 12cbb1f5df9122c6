//! Runtime configuration
//!
//! The vault root and state file location are resolved once by the binary and
//! passed into the library. Nothing below this module reads the environment.

use crate::error::{Result, VaultError};
use crate::io::state::DEFAULT_STATE_FILE;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the vault root
pub const VAULT_PATH_VAR: &str = "VAULT_PATH";
/// Environment variable overriding the state file location
pub const STATE_FILE_VAR: &str = "VAULTNOTES_STATE";

/// Where the vault and the state file live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub vault_root: PathBuf,
    pub state_file: PathBuf,
}

impl VaultConfig {
    /// Config with the default state file location
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }

    pub fn with_state_file(mut self, state_file: impl Into<PathBuf>) -> Self {
        self.state_file = state_file.into();
        self
    }

    /// Resolve from the process environment, after loading `.env` from the
    /// working directory if present. The vault root is validated.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; variables may come from the shell.
        let _ = dotenvy::dotenv();

        let raw = env::var(VAULT_PATH_VAR).unwrap_or_default();
        let config = Self::from_values(&raw, env::var(STATE_FILE_VAR).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_values(vault_path: &str, state_file: Option<String>) -> Result<Self> {
        let trimmed = vault_path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches(['/', '\\'])
        } else {
            trimmed
        };
        if trimmed.is_empty() {
            return Err(VaultError::config(format!(
                "{VAULT_PATH_VAR} is not set or not a directory. Set it in .env."
            )));
        }

        let config = Self::new(trimmed);
        Ok(match state_file.filter(|s| !s.trim().is_empty()) {
            Some(state_file) => config.with_state_file(state_file),
            None => config,
        })
    }

    /// The vault root must be an existing directory
    pub fn validate(&self) -> Result<()> {
        if !self.vault_root.is_dir() {
            return Err(VaultError::config(format!(
                "{VAULT_PATH_VAR} is not set or not a directory: {}",
                self.vault_root.display()
            )));
        }
        Ok(())
    }

    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }
}
