//! # Configuration Module
//!
//! Settings are read from a TOML file, then overridden by command-line flags
//! (which may themselves come from environment variables).
//!
//! ## Config Location
//!
//! - Linux: `~/.config/tunelist/config.toml`
//! - macOS: `~/Library/Application Support/tunelist/config.toml`
//! - Windows: `%APPDATA%\tunelist\config.toml`
//!
//! ## Example
//!
//! ```toml
//! source = "https://docs.google.com/spreadsheets/d/<id>/export?format=csv"
//! has_headers = false
//! set_length = 3
//! max_attempts = 100
//! weights = "/home/me/tunes/weights.json"
//!
//! [columns]
//! dance = 1
//! title = 2
//! key = 3
//! instrument = 4
//! difficulty = 5
//! ```

use crate::error::{Result, TuneError};
use crate::loader::LoadOptions;
use crate::sequence::{DEFAULT_MAX_ATTEMPTS, DEFAULT_SET_LENGTH};
use crate::tune::ColumnLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tune list read when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "list.csv";

/// Returns the platform-appropriate config file path, if the platform has a
/// config directory at all.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tunelist").join("config.toml"))
}

/// Everything the command line needs to load tunes and build sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Local path or http(s) URL of the tune list.
    pub source: String,
    /// Whether the first row of the list is a header.
    pub has_headers: bool,
    pub columns: ColumnLayout,
    /// JSON weight table replacing the built-in one.
    pub weights: Option<PathBuf>,
    pub set_length: usize,
    /// Draws allowed per set slot.
    pub max_attempts: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            has_headers: false,
            columns: ColumnLayout::default(),
            weights: None,
            set_length: DEFAULT_SET_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Loads settings.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// config file is used if present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TuneError::Config(format!("cannot read {}: {e}", path.display())))?;
        let settings = Self::from_toml(&contents)
            .map_err(|e| TuneError::Config(format!("{}: {e}", path.display())))?;
        log::info!("Loaded config from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(TuneError::Config("source must not be empty".to_string()));
        }
        if self.set_length == 0 {
            return Err(TuneError::Config("set_length must be at least 1".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(TuneError::Config("max_attempts must be at least 1".to_string()));
        }
        self.columns.validate()
    }

    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: self.columns,
            has_headers: self.has_headers,
        }
    }
}
