// Design-token registry, discovery and theme interchange

pub mod cache;
pub mod discovery;
pub mod errors;
pub mod events;
pub mod export;
pub mod import;
pub mod inference;
pub mod migration;
pub mod palette;
pub mod preset;
pub mod presets;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod errors_tests;
#[cfg(test)]
mod store_tests;

// Re-exports
pub use cache::{CacheStats, DiscoveryCache};
pub use discovery::{BaseThemeSource, DiscoveryStats, EmbeddedThemeSource, TokenDiscovery};
pub use errors::{ThemingError, TokenValidationError};
pub use events::{ExternalConfigChange, ThemeEvent};
pub use export::{ExportFormat, ExportOptions, ExportResult, ThemeExporter};
pub use import::{ConflictResolution, ImportOptions, ImportResult, ImportSource, ImportValidation, ThemeImporter};
pub use preset::{ColorOverride, PresetMetadata, PresetTokens, StructuredTokens, ThemePreset};
pub use presets::{built_in_presets, PresetManager};
pub use service::{ThemeService, TokenChange, TokenState};
pub use store::{StoreSnapshot, StoreStats, TokenStore};
pub use types::{
    BaseTheme, DesignToken, TokenCategory, TokenId, TokenRelationship, TokenType, TokenValidation, TokenValue,
};
