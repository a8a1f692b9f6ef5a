//! Session configuration
//!
//! Loaded from YAML:
//!
//! ```yaml
//! username: alice
//! filesystem_path: ./fs.zip
//! log_path: ./log.csv
//! start_script: ./startup_script.txt   # optional
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Startup parameters of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Session user, also the default owner of every entry.
    pub username: String,
    /// Archive backing the virtual filesystem. Must exist at startup.
    pub filesystem_path: PathBuf,
    /// Audit log, created empty if absent.
    pub log_path: PathBuf,
    /// Commands run before interactive input. A missing file is tolerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_script: Option<PathBuf>,
}

impl ShellConfig {
    pub fn new(
        username: impl Into<String>,
        filesystem_path: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.into(),
            filesystem_path: filesystem_path.into(),
            log_path: log_path.into(),
            start_script: None,
        }
    }

    /// Set the start script.
    pub fn start_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.start_script = Some(path.into());
        self
    }

    /// Parse YAML configuration text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ShellConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Check fields that deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::Config("username must not be empty".to_string()));
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "username '{}' must not contain whitespace",
                self.username
            )));
        }
        Ok(())
    }
}
