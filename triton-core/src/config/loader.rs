//! Configuration loading for the Triton core.
//!
//! [`ConfigLoader`] locates `config.toml`, deserializes it into a [`CoreConfig`],
//! applies defaults and validates the result.
//!
//! ```rust,ignore
//! use triton_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Logging level: {}", config.logging.level),
//!     Err(e) => {
//!         triton_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration loading failed: {}", e);
//!     }
//! }
//! ```
//!
//! ## Validation
//!
//! - Log level and format are normalized to lowercase and checked.
//! - Relative log file paths are resolved against the application state directory.
//! - Theming limits must be non-zero.

use std::fs;
use std::path::Path;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as triton_fs;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

/// Namespace for configuration loading logic.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `config.toml` from the application config directory.
    ///
    /// A missing file is not an error: the default configuration is used instead.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DirectoryUnavailable`] if the config directory cannot be determined.
    /// - [`ConfigError::ReadError`] / [`ConfigError::ParseError`] for unreadable or malformed files.
    /// - [`ConfigError::ValidationError`] if a value is out of range.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let path = get_app_config_dir()?.join("config.toml");
        Self::load_from_path(&path)
    }

    /// Loads and validates the configuration stored at `path`.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::load_from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration at {:?}, using defaults", path);
                let mut config = CoreConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Parses and validates TOML text. Blank input yields the defaults.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = if content.trim().is_empty() {
            CoreConfig::default()
        } else {
            toml::from_str(content).map_err(ConfigError::ParseError)?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(file_path) = &config.logging.file_path {
            let absolute_path = if file_path.is_absolute() {
                file_path.clone()
            } else {
                get_app_state_dir()?.join(file_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    triton_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        let theming = &config.theming;
        let zero_field = [
            ("cache_ttl_hours", theming.cache_ttl_hours == 0),
            ("max_user_presets", theming.max_user_presets == 0),
            ("max_import_size_bytes", theming.max_import_size_bytes == 0),
            ("archive_timeout_ms", theming.archive_timeout_ms == 0),
            ("history_limit", theming.history_limit == 0),
        ]
        .into_iter()
        .find(|(_, is_zero)| *is_zero);
        if let Some((field, _)) = zero_field {
            return Err(CoreError::Config(ConfigError::ValidationError(format!(
                "theming.{} must be greater than zero",
                field
            ))));
        }

        Ok(())
    }
}
