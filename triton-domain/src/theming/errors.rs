use thiserror::Error;
use triton_core::error::CoreError;

use super::types::{BaseTheme, TokenId};

#[derive(Error, Debug)]
pub enum ThemingError {
    #[error("Token '{token_id}' not found")]
    TokenNotFound { token_id: TokenId },

    #[error("Invalid token value for token '{token_id}': {message}")]
    InvalidTokenValue { token_id: TokenId, message: String },

    #[error("Cyclic token reference detected involving token '{token_id}'. Path: {path:?}")]
    CyclicTokenReference { token_id: TokenId, path: Vec<TokenId> },

    #[error("Failed to load base theme '{theme}': {reason}")]
    BaseThemeLoad { theme: BaseTheme, reason: String },

    #[error("Preset with ID {preset_id} not found")]
    PresetNotFound { preset_id: String },

    #[error("Cannot modify built-in preset '{preset_id}'")]
    BuiltInPresetImmutable { preset_id: String },

    #[error("Maximum preset limit ({limit}) reached. Please delete some presets first.")]
    PresetLimitExceeded { limit: usize },

    #[error("Invalid preset file format: {}", .errors.join("; "))]
    InvalidPreset { errors: Vec<String> },

    #[error("Package name is required for package format")]
    PackageNameRequired,

    #[error("Package options are required for package format")]
    PackageOptionsRequired,

    #[error("Unsupported export format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Storage operation '{operation}' failed: {source_error}")]
    Storage {
        operation: String,
        #[source]
        source_error: CoreError,
    },

    #[error("Change '{change_id}' not found in history")]
    ChangeNotFound { change_id: String },

    #[error("An internal theming error occurred: {context}")]
    Internal { context: String },
}

impl ThemingError {
    pub fn invalid_value(token_id: impl Into<TokenId>, message: impl Into<String>) -> Self {
        ThemingError::InvalidTokenValue {
            token_id: token_id.into(),
            message: message.into(),
        }
    }

    pub fn storage(operation: impl Into<String>, source_error: CoreError) -> Self {
        ThemingError::Storage {
            operation: operation.into(),
            source_error,
        }
    }

    pub fn archive(message: impl Into<String>) -> Self {
        ThemingError::Archive { message: message.into() }
    }
}

impl From<serde_json::Error> for ThemingError {
    fn from(err: serde_json::Error) -> Self {
        ThemingError::Serialization { message: err.to_string() }
    }
}

impl From<zip::result::ZipError> for ThemingError {
    fn from(err: zip::result::ZipError) -> Self {
        ThemingError::Archive { message: err.to_string() }
    }
}

/// Why a value was rejected by a token's validation rule.
///
/// The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenValidationError {
    #[error("Value must be at least {min}")]
    BelowMinimum { min: f64 },

    #[error("Value must be at most {max}")]
    AboveMaximum { max: f64 },

    #[error("Value does not match required pattern")]
    PatternMismatch,

    #[error("Value must be one of: {}", .allowed.join(", "))]
    NotAllowed { allowed: Vec<String> },

    #[error("Validation pattern '{pattern}' is not a valid regular expression")]
    InvalidPattern { pattern: String },

    #[error("{0}")]
    Custom(String),
}
