//! Configuration for the Triton token engine.
//!
//! The root type is [`CoreConfig`], deserialized from TOML by [`ConfigLoader`].
//! Every section and field has a default, so an empty file (or no file at all)
//! produces a usable configuration.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [theming]
//! cache_ttl_hours = 12
//! max_user_presets = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(crate) mod defaults;
mod loader;

pub use loader::ConfigLoader;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub theming: ThemingConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            storage: StorageConfig::default(),
            theming: ThemingConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the application state dir.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// `text` or `json`.
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Where persisted state (presets, discovery cache) lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory for the file-backed key-value store. `None` means the
    /// platform application data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Limits and timings of the token engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemingConfig {
    /// Age after which a discovery cache entry is stale.
    #[serde(default = "defaults::default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,
    /// Maximum number of user presets.
    #[serde(default = "defaults::default_max_user_presets")]
    pub max_user_presets: usize,
    /// Files above this size are rejected by the importer.
    #[serde(default = "defaults::default_max_import_size_bytes")]
    pub max_import_size_bytes: u64,
    /// Upper bound for building or reading one archive.
    #[serde(default = "defaults::default_archive_timeout_ms")]
    pub archive_timeout_ms: u64,
    /// Number of token changes kept for revert.
    #[serde(default = "defaults::default_history_limit")]
    pub history_limit: usize,
}

impl Default for ThemingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: defaults::default_cache_ttl_hours(),
            max_user_presets: defaults::default_max_user_presets(),
            max_import_size_bytes: defaults::default_max_import_size_bytes(),
            archive_timeout_ms: defaults::default_archive_timeout_ms(),
            history_limit: defaults::default_history_limit(),
        }
    }
}

impl ThemingConfig {
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_hours * 60 * 60)
    }

    pub fn archive_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.archive_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: CoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.theming.max_user_presets, 20);
        assert_eq!(config.theming.cache_ttl_hours, 24);
        assert_eq!(config.theming.max_import_size_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: CoreConfig = toml::from_str("[theming]\nmax_user_presets = 5\n").unwrap();
        assert_eq!(config.theming.max_user_presets, 5);
        assert_eq!(config.theming.history_limit, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<CoreConfig, _> = toml::from_str("[theming]\nmax_presets = 5\n");
        assert!(result.is_err());
    }

    #[test]
    fn durations_are_derived_from_fields() {
        let config = ThemingConfig { cache_ttl_hours: 2, archive_timeout_ms: 1500, ..Default::default() };
        assert_eq!(config.cache_ttl().as_secs(), 7200);
        assert_eq!(config.archive_timeout().as_millis(), 1500);
    }
}
