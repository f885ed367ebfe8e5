//! Core infrastructure for the Triton design-token engine.
//!
//! This crate holds everything the token engine needs that is not about tokens:
//! error types, TOML configuration, `tracing` setup, the key-value persistence
//! surface, color math and filesystem helpers.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig, StorageConfig, ThemingConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use types::{Color, ColorParseError};
