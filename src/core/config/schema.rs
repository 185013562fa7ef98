//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Reader Config
//!
//! Located at (in order of precedence):
//! 1. `$REPOVIEW_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repoview/config.toml`
//! 3. `~/.repoview/config.toml`
//!
//! # Validation
//!
//! Values are validated after parsing so a typo cannot turn the retry
//! loop off or stall callers for minutes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Attempts made when no value is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Pause between attempts when no value is configured.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound accepted for `backoff_ms`.
const MAX_BACKOFF_MS: u64 = 60_000;

/// Settings for the repository reader.
///
/// # Example
///
/// ```toml
/// max_attempts = 5
/// backoff_ms = 250
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Total read attempts when the repository is locked
    pub max_attempts: Option<u32>,

    /// Pause between attempts, in milliseconds
    pub backoff_ms: Option<u64>,
}

impl ReaderConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if let Some(ms) = self.backoff_ms {
            if ms > MAX_BACKOFF_MS {
                return Err(ConfigError::InvalidValue(format!(
                    "backoff_ms {} exceeds maximum of {}",
                    ms, MAX_BACKOFF_MS
                )));
            }
        }

        Ok(())
    }

    /// Number of attempts, defaulting to 3.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    /// Pause between attempts, defaulting to 500ms.
    pub fn backoff(&self) -> Duration {
        self.backoff_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_BACKOFF)
    }
}
