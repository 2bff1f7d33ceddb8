//! Runtime settings for FileMon
//!
//! Settings come from defaults, an optional TOML file and environment
//! variables, in that order. The pattern rules themselves live in a separate
//! INI-style file, see [`crate::patterns`].

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

/// What to do with a trailing line that has no terminator yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialLinePolicy {
    /// Leave the fragment unread until its newline arrives
    Withhold,
    /// Report the fragment as a line right away and consume it
    Emit,
}

/// Engine settings shared by the monitor and the host loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Tick cadence in milliseconds
    pub poll_interval_ms: u64,
    /// Let `start` succeed when none of the files could be opened
    pub allow_empty_start: bool,
    /// Handling of a trailing unterminated fragment
    pub partial_lines: PartialLinePolicy,
    /// Upper bound on bytes read from one file in one poll
    pub max_read_bytes: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            allow_empty_start: true,
            partial_lines: PartialLinePolicy::Withhold,
            max_read_bytes: 8 * 1024 * 1024,
        }
    }
}

impl MonitorSettings {
    /// Get poll interval duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load settings from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override with environment variables if present
    pub fn apply_env(mut self) -> Self {
        if let Ok(val) = std::env::var("FILEMON_POLL_INTERVAL_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.poll_interval_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("FILEMON_MAX_READ_BYTES") {
            if let Ok(bytes) = val.parse::<u64>() {
                self.max_read_bytes = bytes;
            }
        }

        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.max_read_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_read_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
