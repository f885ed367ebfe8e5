//! Domain layer of the Triton design-token engine.
//!
//! Everything lives under [`theming`]: the token registry, discovery from base
//! themes, preset management and the export/import formats. [`ThemeService`] is
//! the entry point for hosts.

pub mod theming;

pub use theming::{
    BaseTheme, DesignToken, ThemeEvent, ThemePreset, ThemeService, ThemingError, TokenId, TokenStore, TokenValue,
};
