//! Error types for FileMon
//!
//! Every failure here degrades to "skip and continue" at the narrowest scope.
//! None of them is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or interpret a configuration resource
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The TOML settings file is malformed
    #[error("Failed to parse settings: {0}")]
    ParseSettings(#[from] toml::de::Error),

    /// A setting has an unusable value
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// A monitored file that could not be opened. Non-fatal: the file is left out.
#[derive(Error, Debug)]
#[error("Failed to open monitored file {path}: {source}")]
pub struct FileOpenError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// Reasons `Monitor::start` refuses to enter the active state
#[derive(Error, Debug)]
pub enum StartError {
    #[error("No files selected for monitoring")]
    NoFiles,

    #[error("No patterns file selected")]
    NoPatternsPath,

    #[error("Monitoring is already active")]
    AlreadyActive,

    /// Only raised when `allow_empty_start` is disabled
    #[error("None of the selected files could be opened")]
    NoReadableFiles,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
