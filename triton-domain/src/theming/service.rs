//! The collaborator-facing facade of the token engine.
//!
//! [`ThemeService`] owns the [`TokenStore`] and the change history behind one
//! `tokio::sync::RwLock`, so every registry mutation is serialized. Discovery,
//! export, import and preset persistence are delegated to their own components.
//! Changes are published as [`ThemeEvent`]s on a broadcast channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use triton_core::config::ThemingConfig;
use triton_core::storage::KeyValueStore;
use uuid::Uuid;

use super::cache::DiscoveryCache;
use super::discovery::{BaseThemeSource, TokenDiscovery};
use super::errors::ThemingError;
use super::events::{ExternalConfigChange, ThemeEvent};
use super::export::{ExportOptions, ExportResult, ThemeExporter};
use super::import::{ImportOptions, ImportResult, ImportSource, ImportValidation, ThemeImporter};
use super::preset::{PresetTokens, ThemePreset, DEFAULT_PRESET_VERSION};
use super::presets::PresetManager;
use super::store::{StoreSnapshot, StoreStats, TokenStore};
use super::types::{BaseTheme, DesignToken, TokenId, TokenType, TokenValue};

pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One tracked edit of a token value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenChange {
    pub id: String,
    pub token_id: TokenId,
    pub token_label: String,
    pub old_value: TokenValue,
    pub new_value: TokenValue,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// The new value again for color tokens, for swatch display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Registry snapshot plus change history, as produced by
/// [`ThemeService::export_token_state`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenState {
    pub registry: StoreSnapshot,
    #[serde(default)]
    pub history: Vec<TokenChange>,
}

struct ThemeServiceState {
    store: TokenStore,
    history: VecDeque<TokenChange>,
}

impl ThemeServiceState {
    fn push_change(&mut self, change: TokenChange, limit: usize) {
        self.history.push_back(change);
        while self.history.len() > limit {
            self.history.pop_front();
        }
    }
}

/// Replaces `{id}` placeholders with the resolved values of the referenced tokens.
/// Unknown ids and cycles leave the placeholder in place.
fn resolve_value(store: &TokenStore, value: &TokenValue, visiting: &mut HashSet<String>) -> TokenValue {
    let TokenValue::Text(text) = value else {
        return value.clone();
    };
    let references = value.references();
    if references.is_empty() {
        return value.clone();
    }
    if value.is_reference() {
        let id = &references[0];
        return match store.get_token(id) {
            Some(token) if visiting.insert(id.clone()) => {
                let resolved = resolve_value(store, &token.value, visiting);
                visiting.remove(id);
                resolved
            }
            _ => value.clone(),
        };
    }

    let mut resolved = text.clone();
    for id in references {
        if let Some(token) = store.get_token(&id) {
            if visiting.insert(id.clone()) {
                let inner = resolve_value(store, &token.value, visiting);
                visiting.remove(&id);
                resolved = resolved.replace(&format!("{{{}}}", id), &inner.to_string());
            }
        }
    }
    TokenValue::Text(resolved)
}

#[derive(Clone)]
pub struct ThemeService {
    state: Arc<RwLock<ThemeServiceState>>,
    discovery: Arc<TokenDiscovery>,
    exporter: ThemeExporter,
    importer: ThemeImporter,
    presets: Arc<PresetManager>,
    history_limit: usize,
    event_sender: broadcast::Sender<ThemeEvent>,
    external_sender: broadcast::Sender<ExternalConfigChange>,
}

impl ThemeService {
    /// Creates a service with an empty registry. Call
    /// [`refresh_tokens`](Self::refresh_tokens) to populate it from discovery.
    pub fn new(config: &ThemingConfig, source: Arc<dyn BaseThemeSource>, storage: Arc<dyn KeyValueStore>) -> Self {
        let cache = DiscoveryCache::new(storage.clone(), config.cache_ttl());
        let (event_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (external_sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(ThemeServiceState {
                store: TokenStore::new(),
                history: VecDeque::new(),
            })),
            discovery: Arc::new(TokenDiscovery::new(source, cache)),
            exporter: ThemeExporter::new(config.archive_timeout()),
            importer: ThemeImporter::from_config(config),
            presets: Arc::new(PresetManager::from_config(storage, config)),
            history_limit: config.history_limit,
            event_sender,
            external_sender,
        }
    }

    pub fn presets(&self) -> &PresetManager {
        &self.presets
    }

    pub fn discovery(&self) -> &TokenDiscovery {
        &self.discovery
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemeEvent> {
        self.event_sender.subscribe()
    }

    fn publish(&self, event: ThemeEvent) {
        if let Err(e) = self.event_sender.send(event) {
            debug!("No subscribers for theme event: {}", e);
        }
    }

    pub async fn register_tokens(&self, tokens: Vec<DesignToken>) -> Result<(), ThemingError> {
        self.state.write().await.store.register_batch(tokens)
    }

    pub async fn get_token(&self, id: &str) -> Option<DesignToken> {
        self.state.read().await.store.get_token(id).cloned()
    }

    /// The stored value of `id`, with reference placeholders kept.
    pub async fn get_token_value(&self, id: &str) -> Option<TokenValue> {
        self.state.read().await.store.get_token(id).map(|t| t.value.clone())
    }

    /// The value of `id` with every `{...}` placeholder replaced by the value it
    /// points to, recursively.
    pub async fn resolve_token_value(&self, id: &str) -> Option<TokenValue> {
        let state = self.state.read().await;
        let token = state.store.get_token(id)?;
        let mut visiting = HashSet::from([id.to_string()]);
        Some(resolve_value(&state.store, &token.value, &mut visiting))
    }

    /// Validates and applies a new value, records it in the history and signals
    /// every transitive dependent.
    ///
    /// # Errors
    ///
    /// [`ThemingError::TokenNotFound`] for unknown ids and
    /// [`ThemingError::InvalidTokenValue`] when the token's rule rejects `value`.
    pub async fn update_token_with_tracking(
        &self,
        id: &str,
        value: TokenValue,
        component: Option<&str>,
    ) -> Result<TokenChange, ThemingError> {
        let (change, dependents) = {
            let mut state = self.state.write().await;
            let token = state.store.get_token(id).ok_or_else(|| ThemingError::TokenNotFound {
                token_id: TokenId::new(id),
            })?;
            token
                .validation
                .as_ref()
                .map_or(Ok(()), |rule| rule.check(&value))
                .map_err(|e| ThemingError::invalid_value(id, e.to_string()))?;

            let change = TokenChange {
                id: format!("change-{}", Uuid::new_v4()),
                token_id: token.id.clone(),
                token_label: token.label.clone(),
                old_value: token.value.clone(),
                new_value: value.clone(),
                timestamp: Utc::now(),
                component: component.map(str::to_string),
                color: (token.token_type == TokenType::Color).then(|| value.to_string()),
            };
            state.push_change(change.clone(), self.history_limit);
            let dependents = state.store.update_token_value(id, value.clone());
            (change, dependents)
        };

        debug!("Token {} updated, {} dependents signalled", id, dependents.len());
        self.publish(ThemeEvent::TokenUpdated {
            token_id: change.token_id.clone(),
            value,
            dependents,
        });
        Ok(change)
    }

    pub async fn history(&self) -> Vec<TokenChange> {
        self.state.read().await.history.iter().cloned().collect()
    }

    pub async fn clear_history(&self) {
        self.state.write().await.history.clear();
    }

    /// Whether the latest recorded change of `id` differs from its default value.
    pub async fn is_token_modified(&self, id: &str) -> bool {
        let state = self.state.read().await;
        let Some(token) = state.store.get_token(id) else {
            return false;
        };
        state
            .history
            .iter()
            .rev()
            .find(|c| c.token_id.as_str() == id)
            .is_some_and(|c| c.new_value != token.default_value)
    }

    /// Restores the value a change replaced and drops that change and every later one.
    pub async fn revert_to_change(&self, change_id: &str) -> Result<(), ThemingError> {
        let (token_id, value, dependents) = {
            let mut state = self.state.write().await;
            let index = state
                .history
                .iter()
                .position(|c| c.id == change_id)
                .ok_or_else(|| ThemingError::ChangeNotFound {
                    change_id: change_id.to_string(),
                })?;
            let change = state.history[index].clone();
            state.history.truncate(index);
            let dependents = state.store.update_token_value(change.token_id.as_str(), change.old_value.clone());
            (change.token_id, change.old_value, dependents)
        };

        info!("Reverted token {} to change {}", token_id, change_id);
        self.publish(ThemeEvent::TokenUpdated {
            token_id,
            value,
            dependents,
        });
        Ok(())
    }

    /// Sets `id` back to its default value as a tracked change.
    pub async fn reset_token(&self, id: &str) -> Result<TokenChange, ThemingError> {
        let default_value = self
            .get_token(id)
            .await
            .map(|t| t.default_value)
            .ok_or_else(|| ThemingError::TokenNotFound { token_id: TokenId::new(id) })?;
        self.update_token_with_tracking(id, default_value, None).await
    }

    /// Sets every token that appears in the history back to its default and clears
    /// the history. Returns the reset ids.
    pub async fn reset_all_changes(&self) -> Vec<TokenId> {
        let reset = {
            let mut state = self.state.write().await;
            let ids: Vec<TokenId> = {
                let mut seen = HashSet::new();
                state
                    .history
                    .iter()
                    .filter(|c| seen.insert(c.token_id.clone()))
                    .map(|c| c.token_id.clone())
                    .collect()
            };
            let mut reset = Vec::new();
            for id in ids {
                let Some(default_value) = state.store.get_token(id.as_str()).map(|t| t.default_value.clone()) else {
                    continue;
                };
                state.store.update_token_value(id.as_str(), default_value);
                reset.push(id);
            }
            state.history.clear();
            reset
        };

        info!("Reset {} modified tokens", reset.len());
        self.publish(ThemeEvent::TokensReset { token_ids: reset.clone() });
        reset
    }

    pub async fn export_token_state(&self) -> TokenState {
        let state = self.state.read().await;
        TokenState {
            registry: state.store.export(),
            history: state.history.iter().cloned().collect(),
        }
    }

    /// Replaces registry and history. A rejected registry leaves both untouched.
    pub async fn import_token_state(&self, token_state: TokenState) -> Result<(), ThemingError> {
        let mut state = self.state.write().await;
        state.store.import(token_state.registry)?;
        let skip = token_state.history.len().saturating_sub(self.history_limit);
        state.history = token_state.history.into_iter().skip(skip).collect();
        Ok(())
    }

    /// A user preset holding the latest value of every changed token.
    pub async fn create_preset_from_current_state(&self) -> ThemePreset {
        let now = Utc::now();
        let tokens: BTreeMap<String, Value> = self
            .state
            .read()
            .await
            .history
            .iter()
            .map(|c| (c.token_id.to_string(), c.new_value.to_json()))
            .collect();
        let tags = vec!["custom".to_string(), "generated".to_string()];

        let mut preset = ThemePreset::new(format!("custom_{}", now.timestamp_millis()), "Custom Theme", BaseTheme::Aura);
        preset.description = Some("Theme created from current modifications".to_string());
        preset.tags = tags.clone();
        preset.tokens = Some(PresetTokens::Flat(tokens));
        preset.metadata.created = now;
        preset.metadata.modified = now;
        preset.metadata.version = DEFAULT_PRESET_VERSION.to_string();
        preset.metadata.tags = tags;
        preset
    }

    /// Discards the registry and the discovery cache, then registers a fresh
    /// discovery of `base_theme`. Returns the number of registered tokens.
    pub async fn refresh_tokens(&self, base_theme: BaseTheme) -> usize {
        self.discovery.clear_cache().await;
        let groups = self.discovery.discover_all_tokens(base_theme).await;

        let mut state = self.state.write().await;
        state.store.clear();
        for token in groups.into_values().flatten() {
            let id = token.id.clone();
            if let Err(e) = state.store.register(token) {
                warn!("Skipping discovered token {}: {}", id, e);
            }
        }
        let count = state.store.len();
        info!("Registry refreshed with {} discovered tokens", count);
        count
    }

    pub async fn search_tokens(&self, query: &str) -> Vec<DesignToken> {
        self.state
            .read()
            .await
            .store
            .search_tokens(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get_stats(&self) -> StoreStats {
        self.state.read().await.store.get_stats()
    }

    pub async fn export_theme(&self, preset: &ThemePreset, format: &str, options: &ExportOptions) -> ExportResult {
        let state = self.state.read().await;
        self.exporter.export_theme(&state.store, preset, format, options).await
    }

    pub async fn validate_import(&self, source: &ImportSource) -> ImportValidation {
        self.importer.validate_import(source).await
    }

    /// Parses `source` without holding the registry lock, then applies it under
    /// the write lock.
    pub async fn import_theme(&self, source: ImportSource, options: &ImportOptions) -> ImportResult {
        let parsed = match self.importer.prepare(source).await {
            Ok(parsed) => parsed,
            Err(report) => return ImportResult::rejected(report),
        };

        let result = {
            let mut state = self.state.write().await;
            self.importer.apply(&mut state.store, parsed, options)
        };

        if let (true, false, Some(preset)) = (result.success, options.preview_only, result.preset.as_ref()) {
            info!("Theme '{}' imported", preset.name);
            self.publish(ThemeEvent::TokensImported {
                preset_id: preset.id.clone(),
                count: result.imported_tokens.unwrap_or_default(),
            });
        }
        result
    }

    /// Receiver for settings changed outside this process.
    pub fn on_external_config_change(&self) -> broadcast::Receiver<ExternalConfigChange> {
        self.external_sender.subscribe()
    }

    /// Entry point for the host to report that a persisted key changed elsewhere.
    /// The change is forwarded to external-change receivers and to the event stream.
    pub fn notify_external_config_change(&self, key: &str, value: Option<String>) {
        let change = ExternalConfigChange::new(key, value);
        debug!("External config change for key '{}'", change.key);
        if let Err(e) = self.external_sender.send(change.clone()) {
            debug!("No listeners for external config change: {}", e);
        }
        self.publish(ThemeEvent::ExternalConfigChanged(change));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theming::types::TokenCategory;

    #[test]
    fn nested_and_embedded_references_resolve() {
        let mut store = TokenStore::new();
        store
            .register_batch([
                DesignToken::new("brand.base", TokenCategory::Custom, "base", "#0b2244", TokenType::Color),
                DesignToken::new("brand.alias", TokenCategory::Custom, "alias", "{brand.base}", TokenType::Color)
                    .with_dependencies(["brand.base"]),
                DesignToken::new("brand.ring", TokenCategory::Custom, "ring", "0 0 0 2px {brand.alias}", TokenType::Shadow)
                    .with_dependencies(["brand.alias"]),
                DesignToken::new("brand.loose", TokenCategory::Custom, "loose", "{missing.token}", TokenType::Color),
            ])
            .unwrap();

        let resolve = |id: &str| {
            let token = store.get_token(id).unwrap();
            let mut visiting = HashSet::from([id.to_string()]);
            resolve_value(&store, &token.value, &mut visiting)
        };
        assert_eq!(resolve("brand.alias"), TokenValue::from("#0b2244"));
        assert_eq!(resolve("brand.ring"), TokenValue::from("0 0 0 2px #0b2244"));
        assert_eq!(resolve("brand.loose"), TokenValue::from("{missing.token}"));
    }
}
