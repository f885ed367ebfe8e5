use serde::{Deserialize, Serialize};

use crate::theming::types::{TokenId, TokenValue};

/// Published by [`crate::theming::service::ThemeService`] after every registry change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ThemeEvent {
    #[serde(rename_all = "camelCase")]
    TokenUpdated {
        token_id: TokenId,
        value: TokenValue,
        /// Transitive dependents that were signalled.
        dependents: Vec<TokenId>,
    },
    #[serde(rename_all = "camelCase")]
    TokensImported { preset_id: String, count: usize },
    #[serde(rename_all = "camelCase")]
    TokensReset { token_ids: Vec<TokenId> },
    ExternalConfigChanged(ExternalConfigChange),
}

/// A persisted setting changed outside this process (another window, another tab).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalConfigChange {
    pub key: String,
    /// `None` when the key was removed.
    pub value: Option<String>,
}

impl ExternalConfigChange {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self { key: key.into(), value }
    }
}
