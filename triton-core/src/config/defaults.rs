//! Default configuration values.
//!
//! These functions are referenced by `serde`'s `default` attribute in the
//! configuration structures.

use crate::config::LoggingConfig;
use std::path::PathBuf;

/// Returns the default `LoggingConfig`.
pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

/// No log file by default.
pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_cache_ttl_hours() -> u64 {
    24
}

pub(crate) fn default_max_user_presets() -> usize {
    20
}

/// 50 MiB.
pub(crate) fn default_max_import_size_bytes() -> u64 {
    50 * 1024 * 1024
}

pub(crate) fn default_archive_timeout_ms() -> u64 {
    10_000
}

pub(crate) fn default_history_limit() -> usize {
    100
}
