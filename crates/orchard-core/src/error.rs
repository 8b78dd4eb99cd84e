//! Error types for the fallible edges of the core.
//!
//! Gameplay itself never fails: unknown contacts, stale ids and absent sinks
//! are no-ops. Only loading configuration and persisting settings can go
//! wrong, and those paths return these errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or write persisted volume settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read or written.
    #[error("settings file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The settings file is not a JSON object of numbers.
    #[error("settings file {path} is malformed: {source}")]
    Malformed {
        /// File that failed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to load gameplay tuning.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tuning file could not be read.
    #[error("tuning file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The tuning JSON did not parse.
    #[error("tuning is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A tuning value is out of range.
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Any error the core can report.
#[derive(Debug, Error)]
pub enum OrchardError {
    /// Settings persistence failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Tuning could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
