//! Error handling for the Triton core layer.
//!
//! This module defines the error types shared by the infrastructure pieces of the
//! token engine: configuration loading, logging setup, filesystem helpers and the
//! key-value persistence surface. All types are built with `thiserror`.
//!
//! The main error type for this crate is [`CoreError`], which wraps more specific
//! errors like [`ConfigError`] and [`LoggingError`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use triton_core::error::CoreError;
//!
//! fn read_setting(key: &str) -> Result<String, CoreError> {
//!     Err(CoreError::Storage { key: key.to_string(), message: "backend offline".to_string() })
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the Triton token engine.
///
/// This enum represents all errors that can occur in the core layer. Domain crates
/// usually wrap it (e.g. `ThemingError::Storage`) rather than matching on it directly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur during the initialization of the logging system.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(String),

    /// Errors raised while the logging system is running or being configured.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Filesystem operations such as creating directories or reading files.
    /// Includes a message, the path involved, and the source I/O error.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O errors not covered by other specific variants.
    #[error("I/O Error: {0}")]
    Io(#[from] io::Error),

    /// A persistence backend rejected a read or write for `key`.
    #[error("Storage Error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// A write would push the persistence backend over its byte budget.
    #[error("Storage quota exceeded for key '{key}': {requested} bytes requested, limit is {limit} bytes")]
    QuotaExceeded {
        key: String,
        requested: usize,
        limit: usize,
    },

    /// A value could not be serialized or deserialized.
    #[error("Serialization Error: {0}")]
    Serialization(String),

    /// Errors due to invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors within the core library.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if this error means "the thing does not exist" rather than
    /// "the backend failed".
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            CoreError::Filesystem { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An error occurred while parsing a configuration file (e.g., invalid TOML).
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// An error occurred due to invalid configuration values after successful parsing.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (e.g., XDG data home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The subscriber could not be installed or the configuration was unusable.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// Failed to set or parse a log filter.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),
}
