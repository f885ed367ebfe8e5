//! Persistence of discovery results.
//!
//! The whole discovery result is stored as one JSON document under
//! [`DISCOVERY_CACHE_KEY`]: a map from group name to [`CacheEntry`]. The cache fails
//! closed. A single stale or foreign-version entry, or a document that does not
//! parse, clears everything and reports a miss.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use triton_core::storage::KeyValueStore;

use super::types::{DesignToken, TokenGroups};

pub const DISCOVERY_CACHE_KEY: &str = "theme-discovery-cache";
pub const CACHE_VERSION: &str = "1.0.0";

/// One discovery group as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub tokens: Vec<DesignToken>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub version: String,
}

impl CacheEntry {
    fn fresh(tokens: Vec<DesignToken>) -> Self {
        Self {
            tokens,
            timestamp: Utc::now().timestamp_millis(),
            version: CACHE_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub exists: bool,
    /// Length of the stored document in bytes.
    pub size: usize,
    /// Age of the oldest entry.
    pub age_ms: Option<i64>,
    pub entries: usize,
}

type CacheDocument = BTreeMap<String, CacheEntry>;

pub struct DiscoveryCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl DiscoveryCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entry_is_fresh(&self, entry: &CacheEntry, now_ms: i64) -> bool {
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        entry.version == CACHE_VERSION && now_ms.saturating_sub(entry.timestamp) <= ttl_ms
    }

    async fn read_raw(&self) -> Option<String> {
        match self.store.get(DISCOVERY_CACHE_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read discovery cache: {}", e);
                None
            }
        }
    }

    async fn write(&self, document: &CacheDocument) {
        let serialized = match serde_json::to_string(document) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize discovery cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(DISCOVERY_CACHE_KEY, &serialized).await {
            warn!("Failed to save discovery cache: {}", e);
        }
    }

    /// Stores every group with the current timestamp. Never fails; storage errors are logged.
    pub async fn save(&self, groups: &TokenGroups) {
        let document: CacheDocument = groups
            .iter()
            .map(|(group, tokens)| (group.clone(), CacheEntry::fresh(tokens.clone())))
            .collect();
        self.write(&document).await;
        debug!("Token discovery cache saved ({} groups)", document.len());
    }

    /// Returns the cached groups, or `None` after clearing the cache if any entry is
    /// stale, has a different version, or the document is corrupt.
    pub async fn load(&self) -> Option<TokenGroups> {
        let raw = self.read_raw().await?;
        let document: CacheDocument = match serde_json::from_str(&raw) {
            Ok(d) => d,
            Err(e) => {
                warn!("Failed to load discovery cache: {}", e);
                self.clear().await;
                return None;
            }
        };

        let now = Utc::now().timestamp_millis();
        if !document.values().all(|entry| self.entry_is_fresh(entry, now)) {
            info!("Discovery cache is stale or from another version, clearing it");
            self.clear().await;
            return None;
        }

        debug!("Token discovery loaded from cache");
        Some(document.into_iter().map(|(group, entry)| (group, entry.tokens)).collect())
    }

    /// Same checks as [`load`](Self::load) without clearing or returning anything.
    pub async fn is_valid(&self) -> bool {
        let Some(raw) = self.read_raw().await else {
            return false;
        };
        let now = Utc::now().timestamp_millis();
        serde_json::from_str::<CacheDocument>(&raw)
            .map(|document| document.values().all(|entry| self.entry_is_fresh(entry, now)))
            .unwrap_or(false)
    }

    pub async fn clear(&self) {
        match self.store.remove(DISCOVERY_CACHE_KEY).await {
            Ok(()) => debug!("Token discovery cache cleared"),
            Err(e) => warn!("Failed to clear discovery cache: {}", e),
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let Some(raw) = self.read_raw().await else {
            return CacheStats::default();
        };
        let Ok(document) = serde_json::from_str::<CacheDocument>(&raw) else {
            return CacheStats::default();
        };
        let now = Utc::now().timestamp_millis();
        CacheStats {
            exists: true,
            size: raw.len(),
            age_ms: document.values().map(|e| e.timestamp).min().map(|oldest| now - oldest),
            entries: document.len(),
        }
    }

    /// Upserts one group, leaving the timestamps of the others untouched.
    ///
    /// A corrupt document is replaced by one holding only this group.
    pub async fn update_entry(&self, group: &str, tokens: Vec<DesignToken>) {
        let mut document: CacheDocument = self
            .read_raw()
            .await
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        document.insert(group.to_string(), CacheEntry::fresh(tokens));
        self.write(&document).await;
    }
}
