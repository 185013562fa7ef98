//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$REPOVIEW_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repoview/config.toml`
//! 3. `~/.repoview/config.toml`
//!
//! Missing files are not an error; defaults are used. A file that exists
//! but cannot be read, parsed, or validated is an error.
//!
//! # Example
//!
//! ```no_run
//! use repoview::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("attempts: {}", config.reader.max_attempts());
//! println!("backoff: {:?}", config.reader.backoff());
//! ```

pub mod schema;

pub use schema::ReaderConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Reader settings
    pub reader: ReaderConfig,
    /// Path to the config file (if one was loaded)
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader: ReaderConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        reader.validate()?;

        Ok(Self {
            reader,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in the search order.
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $REPOVIEW_CONFIG
        if let Ok(path) = std::env::var("REPOVIEW_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/repoview/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("repoview/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.repoview/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".repoview/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
