//! Built-in and user presets.
//!
//! Built-in presets are defined in code and never persisted. User presets live as
//! one JSON array under [`USER_PRESETS_KEY`] in a [`KeyValueStore`], capped at a
//! configurable count. Exceeding the cap is an error; nothing is evicted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use triton_core::config::ThemingConfig;
use triton_core::storage::KeyValueStore;
use uuid::Uuid;

use super::errors::ThemingError;
use super::migration::{editable_color_tokens, migrate_theme_preset};
use super::palette::refresh_palette;
use super::preset::{ColorOverride, PresetExport, PresetMetadata, ThemePreset, DEFAULT_PRESET_VERSION};
use super::types::BaseTheme;
use super::validation::{validate_color, validate_import_file};

pub const USER_PRESETS_KEY: &str = "triton-user-presets";

/// Written into `appVersion` of exported preset files.
pub const PRESET_APP_VERSION: &str = "1.0.0";

pub const DEFAULT_PRESET_ID: &str = "triton-default";

/// 2024-01-01T00:00:00Z
const BUILT_IN_CREATED_SECS: i64 = 1_704_067_200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetStorageStats {
    /// Length of the stored document in bytes.
    pub size: usize,
    pub size_kb: String,
    pub user_presets: usize,
    pub max_presets: usize,
}

struct BuiltIn {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    base_theme: BaseTheme,
    colors: &'static [(&'static str, &'static str)],
    tags: &'static [&'static str],
}

const BUILT_INS: &[BuiltIn] = &[
    BuiltIn {
        id: "triton-high-contrast",
        name: "High Contrast",
        description: "WCAG AAA compliant high contrast theme for maximum accessibility",
        base_theme: BaseTheme::Material,
        colors: &[
            ("primary", "#000000"),
            ("secondary", "#0066CC"),
            ("success", "#008000"),
            ("warning", "#FF8C00"),
            ("danger", "#CC0000"),
            ("info", "#0066CC"),
            ("surface-0", "#FFFFFF"),
            ("surface-50", "#F5F5F5"),
            ("text-color", "#000000"),
            ("border-color", "#000000"),
        ],
        tags: &["accessibility", "high-contrast", "wcag", "aaa"],
    },
    BuiltIn {
        id: "triton-ocean",
        name: "Ocean",
        description: "Light ocean-inspired theme with teal and blue tones",
        base_theme: BaseTheme::Aura,
        colors: &[
            ("primary", "#0891B2"),
            ("secondary", "#06B6D4"),
            ("success", "#059669"),
            ("info", "#0284C7"),
            ("warning", "#D97706"),
            ("danger", "#DC2626"),
        ],
        tags: &["ocean", "teal", "light", "modern"],
    },
    BuiltIn {
        id: "triton-sunset",
        name: "Sunset",
        description: "Warm sunset colors with orange and red tones",
        base_theme: BaseTheme::Lara,
        colors: &[
            ("primary", "#EA580C"),
            ("secondary", "#F97316"),
            ("success", "#16A34A"),
            ("info", "#0EA5E9"),
            ("warning", "#EAB308"),
            ("danger", "#DC2626"),
        ],
        tags: &["sunset", "warm", "orange", "vibrant"],
    },
    BuiltIn {
        id: "triton-corporate",
        name: "Corporate",
        description: "Professional corporate theme with subtle grays and blues",
        base_theme: BaseTheme::Material,
        colors: &[
            ("primary", "#1F2937"),
            ("secondary", "#374151"),
            ("success", "#10B981"),
            ("info", "#3B82F6"),
            ("warning", "#F59E0B"),
            ("danger", "#EF4444"),
        ],
        tags: &["corporate", "professional", "gray", "business"],
    },
];

fn built_in_preset(
    id: &str,
    name: &str,
    description: &str,
    base_theme: BaseTheme,
    color_overrides: Vec<ColorOverride>,
    tags: Vec<String>,
) -> ThemePreset {
    let created = DateTime::<Utc>::from_timestamp(BUILT_IN_CREATED_SECS, 0).unwrap_or_default();
    let mut preset = ThemePreset::new(id, name, base_theme);
    preset.description = Some(description.to_string());
    preset.color_overrides = color_overrides;
    preset.metadata = PresetMetadata {
        created,
        modified: created,
        author: Some("Triton Team".to_string()),
        version: DEFAULT_PRESET_VERSION.to_string(),
        tags,
        is_default: false,
        is_built_in: true,
    };
    for color_override in &mut preset.color_overrides {
        refresh_palette(color_override, true);
    }
    migrate_theme_preset(&preset).into_owned()
}

/// The presets shipped with the application. The first one is the default.
pub fn built_in_presets() -> Vec<ThemePreset> {
    let defaults = editable_color_tokens()
        .into_iter()
        .map(|t| ColorOverride::new(t.id, t.default_value))
        .collect();
    let mut triton_default = built_in_preset(
        DEFAULT_PRESET_ID,
        "Triton Default",
        "Default Triton theme with navy brand and accent blue colors",
        BaseTheme::Aura,
        defaults,
        vec!["default".to_string(), "triton".to_string()],
    );
    triton_default.metadata.is_default = true;

    let mut presets = vec![triton_default];
    presets.extend(BUILT_INS.iter().map(|b| {
        built_in_preset(
            b.id,
            b.name,
            b.description,
            b.base_theme,
            b.colors.iter().map(|(id, value)| ColorOverride::new(*id, *value)).collect(),
            b.tags.iter().map(|t| t.to_string()).collect(),
        )
    }));
    presets
}

pub fn is_built_in_id(id: &str) -> bool {
    id == DEFAULT_PRESET_ID || BUILT_INS.iter().any(|b| b.id == id)
}

/// Fills in what older stored presets lack: categorized tokens and palettes.
fn upgrade_stored(preset: ThemePreset) -> ThemePreset {
    let mut upgraded = migrate_theme_preset(&preset).into_owned();
    for color_override in &mut upgraded.color_overrides {
        refresh_palette(color_override, false);
    }
    upgraded
}

fn user_id() -> String {
    format!("user-{}", Uuid::new_v4())
}

pub struct PresetManager {
    storage: Arc<dyn KeyValueStore>,
    max_presets: usize,
}

impl PresetManager {
    pub fn new(storage: Arc<dyn KeyValueStore>, max_presets: usize) -> Self {
        Self { storage, max_presets }
    }

    pub fn from_config(storage: Arc<dyn KeyValueStore>, config: &ThemingConfig) -> Self {
        Self::new(storage, config.max_user_presets)
    }

    pub fn max_presets(&self) -> usize {
        self.max_presets
    }

    /// Stored user presets. A document that does not parse counts as empty; a
    /// backend failure is an error.
    async fn stored_presets(&self) -> Result<Vec<ThemePreset>, ThemingError> {
        let raw = self
            .storage
            .get(USER_PRESETS_KEY)
            .await
            .map_err(|e| ThemingError::storage("load user presets", e))?;
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<ThemePreset>>(&raw) {
            Ok(presets) => Ok(presets.into_iter().map(upgrade_stored).collect()),
            Err(e) => {
                warn!("Stored user presets are corrupt, ignoring them: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, presets: &[ThemePreset]) -> Result<(), ThemingError> {
        let serialized = serde_json::to_string(presets)?;
        self.storage
            .set(USER_PRESETS_KEY, &serialized)
            .await
            .map_err(|e| ThemingError::storage("save user presets", e))
    }

    /// User presets, upgraded to the current shape. Never fails.
    pub async fn load_user_presets(&self) -> Vec<ThemePreset> {
        match self.stored_presets().await {
            Ok(presets) => {
                debug!("Loaded {} user presets", presets.len());
                presets
            }
            Err(e) => {
                warn!("Failed to load user presets: {}", e);
                Vec::new()
            }
        }
    }

    /// Built-in presets followed by user presets.
    pub async fn all_presets(&self) -> Vec<ThemePreset> {
        let mut presets = built_in_presets();
        presets.extend(self.load_user_presets().await);
        presets
    }

    pub async fn get_preset(&self, id: &str) -> Option<ThemePreset> {
        self.all_presets().await.into_iter().find(|p| p.id == id)
    }

    /// Inserts or replaces a user preset by id.
    ///
    /// # Errors
    ///
    /// [`ThemingError::PresetLimitExceeded`] when adding a new preset to a full
    /// bucket, [`ThemingError::BuiltInPresetImmutable`] for built-in ids, and
    /// [`ThemingError::Storage`] when the write fails. Nothing is persisted on error.
    pub async fn save_user_preset(&self, preset: ThemePreset) -> Result<(), ThemingError> {
        if is_built_in_id(&preset.id) {
            return Err(ThemingError::BuiltInPresetImmutable { preset_id: preset.id });
        }
        let mut presets = self.stored_presets().await?;
        match presets.iter().position(|p| p.id == preset.id) {
            Some(index) => {
                debug!("Updating user preset '{}'", preset.name);
                presets[index] = preset;
            }
            None => {
                if presets.len() >= self.max_presets {
                    return Err(ThemingError::PresetLimitExceeded { limit: self.max_presets });
                }
                debug!("Adding user preset '{}'", preset.name);
                presets.push(preset);
            }
        }
        self.persist(&presets).await
    }

    pub async fn delete_user_preset(&self, preset_id: &str) -> Result<(), ThemingError> {
        if is_built_in_id(preset_id) {
            return Err(ThemingError::BuiltInPresetImmutable {
                preset_id: preset_id.to_string(),
            });
        }
        let mut presets = self.stored_presets().await?;
        let Some(index) = presets.iter().position(|p| p.id == preset_id) else {
            return Err(ThemingError::PresetNotFound {
                preset_id: preset_id.to_string(),
            });
        };
        if presets[index].is_built_in() {
            return Err(ThemingError::BuiltInPresetImmutable {
                preset_id: preset_id.to_string(),
            });
        }
        let removed = presets.remove(index);
        self.persist(&presets).await?;
        info!("Deleted user preset '{}'", removed.name);
        Ok(())
    }

    /// Copies `preset` into the user bucket under a fresh id.
    pub async fn duplicate_preset(&self, preset: &ThemePreset, new_name: &str) -> Result<ThemePreset, ThemingError> {
        let now = Utc::now();
        let mut duplicated = preset.clone();
        duplicated.id = user_id();
        duplicated.name = new_name.to_string();
        duplicated.description = Some(match &preset.description {
            Some(description) => format!("{} (Copy)", description),
            None => "(Copy)".to_string(),
        });
        duplicated.metadata.created = now;
        duplicated.metadata.modified = now;
        duplicated.metadata.author = Some("User".to_string());
        duplicated.metadata.is_built_in = false;
        duplicated.metadata.is_default = false;

        self.save_user_preset(duplicated.clone()).await?;
        info!("Duplicated preset '{}' as '{}'", preset.name, new_name);
        Ok(duplicated)
    }

    /// Pretty JSON of a [`PresetExport`]. The exported copy gets a throwaway id and
    /// loses its built-in and default flags.
    pub fn export_preset(&self, preset: &ThemePreset) -> Result<String, ThemingError> {
        let now = Utc::now();
        let mut exported = preset.clone();
        exported.id = format!("exported-{}", now.timestamp_millis());
        exported.metadata.is_built_in = false;
        exported.metadata.is_default = false;

        let export = PresetExport {
            preset: exported,
            export_date: now,
            app_version: PRESET_APP_VERSION.to_string(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Reads a preset file written by [`export_preset`](Self::export_preset) and
    /// saves it as a new user preset.
    pub async fn import_preset(&self, file_name: &str, contents: &str) -> Result<ThemePreset, ThemingError> {
        let report = validate_import_file(file_name, contents.len() as u64);
        if !report.is_valid() {
            return Err(ThemingError::InvalidPreset { errors: report.errors });
        }

        let data: Value = serde_json::from_str(contents).map_err(|e| ThemingError::InvalidPreset {
            errors: vec![format!("Invalid JSON: {}", e)],
        })?;
        let preset_value = data.get("preset").cloned().unwrap_or(Value::Null);
        let has_name = preset_value
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|n| !n.is_empty());
        let has_overrides = preset_value.get("colorOverrides").is_some_and(Value::is_array);
        if !has_name || !has_overrides {
            return Err(ThemingError::InvalidPreset {
                errors: vec!["Missing required fields.".to_string()],
            });
        }

        let mut imported: ThemePreset = serde_json::from_value(preset_value).map_err(|e| ThemingError::InvalidPreset {
            errors: vec![e.to_string()],
        })?;
        let now = Utc::now();
        imported.id = user_id();
        imported.metadata.created = now;
        imported.metadata.modified = now;
        imported.metadata.is_built_in = false;
        imported.metadata.is_default = false;
        for color_override in &mut imported.color_overrides {
            refresh_palette(color_override, true);
        }
        let imported = migrate_theme_preset(&imported).into_owned();

        self.save_user_preset(imported.clone()).await?;
        info!("Imported preset '{}' from {}", imported.name, file_name);
        Ok(imported)
    }

    /// Sets one color of a user preset. Brand and status colors get a fresh palette.
    pub async fn update_color_override(&self, preset_id: &str, token_id: &str, value: &str) -> Result<ThemePreset, ThemingError> {
        if is_built_in_id(preset_id) {
            return Err(ThemingError::BuiltInPresetImmutable {
                preset_id: preset_id.to_string(),
            });
        }
        let report = validate_color(value);
        if !report.is_valid() {
            return Err(ThemingError::invalid_value(token_id, report.errors.join("; ")));
        }

        let mut presets = self.stored_presets().await?;
        let preset = presets
            .iter_mut()
            .find(|p| p.id == preset_id)
            .ok_or_else(|| ThemingError::PresetNotFound {
                preset_id: preset_id.to_string(),
            })?;

        match preset.color_overrides.iter_mut().find(|o| o.token_id == token_id) {
            Some(existing) => existing.value = value.to_string(),
            None => preset.color_overrides.push(ColorOverride::new(token_id, value)),
        }
        if let Some(color_override) = preset.color_overrides.iter_mut().find(|o| o.token_id == token_id) {
            refresh_palette(color_override, true);
        }
        preset.metadata.modified = Utc::now();
        let updated = preset.clone();

        self.persist(&presets).await?;
        Ok(updated)
    }

    pub async fn storage_stats(&self) -> PresetStorageStats {
        let raw = match self.storage.get(USER_PRESETS_KEY).await {
            Ok(raw) => raw.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read user presets for stats: {}", e);
                String::new()
            }
        };
        let user_presets = serde_json::from_str::<Vec<Value>>(&raw).map_or(0, |p| p.len());
        PresetStorageStats {
            size: raw.len(),
            size_kb: format!("{:.2}", raw.len() as f64 / 1024.0),
            user_presets,
            max_presets: self.max_presets,
        }
    }

    pub async fn clear_all_user_presets(&self) -> Result<(), ThemingError> {
        self.storage
            .remove(USER_PRESETS_KEY)
            .await
            .map_err(|e| ThemingError::storage("clear user presets", e))?;
        info!("All user presets cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use triton_core::storage::MemoryKeyValueStore;

    fn manager_with(max: usize) -> (PresetManager, Arc<MemoryKeyValueStore>) {
        let storage = Arc::new(MemoryKeyValueStore::new());
        (PresetManager::new(storage.clone(), max), storage)
    }

    fn user_preset(id: &str, name: &str) -> ThemePreset {
        let mut preset = ThemePreset::new(id, name, BaseTheme::Lara);
        preset.description = Some("Mine".to_string());
        preset.color_overrides = vec![ColorOverride::new("primary", "#3366ff")];
        preset
    }

    #[test]
    fn five_built_ins_with_palettes_and_one_default() {
        let presets = built_in_presets();
        let ids: Vec<&str> = presets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["triton-default", "triton-high-contrast", "triton-ocean", "triton-sunset", "triton-corporate"]
        );
        assert!(presets.iter().all(ThemePreset::is_built_in));
        assert_eq!(presets.iter().filter(|p| p.metadata.is_default).count(), 1);

        let ocean = &presets[2];
        assert_eq!(ocean.base_theme, BaseTheme::Aura);
        assert_eq!(ocean.metadata.created.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(ocean.metadata.author.as_deref(), Some("Triton Team"));
        let primary = &ocean.color_overrides[0];
        assert_eq!(primary.palette.as_ref().map(|p| p.len()), Some(11));
        assert!(ocean.tokens.is_some());

        let high_contrast = &presets[1];
        let surface = high_contrast.color_overrides.iter().find(|o| o.token_id == "surface-0").unwrap();
        assert!(surface.palette.is_none());
    }

    #[tokio::test]
    async fn save_upserts_and_enforces_the_cap() {
        let (manager, _) = manager_with(2);
        manager.save_user_preset(user_preset("user-a", "A")).await.unwrap();
        manager.save_user_preset(user_preset("user-b", "B")).await.unwrap();
        manager.save_user_preset(user_preset("user-a", "A renamed")).await.unwrap();

        match manager.save_user_preset(user_preset("user-c", "C")).await {
            Err(ThemingError::PresetLimitExceeded { limit }) => assert_eq!(limit, 2),
            other => panic!("Expected limit error, got {:?}", other),
        }

        let names: Vec<String> = manager.load_user_presets().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A renamed".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn built_ins_cannot_be_deleted_or_overwritten() {
        let (manager, _) = manager_with(20);
        manager.save_user_preset(user_preset("user-a", "A")).await.unwrap();

        assert!(matches!(
            manager.delete_user_preset("triton-ocean").await,
            Err(ThemingError::BuiltInPresetImmutable { .. })
        ));
        assert!(matches!(
            manager.save_user_preset(built_in_presets().remove(0)).await,
            Err(ThemingError::BuiltInPresetImmutable { .. })
        ));
        assert_eq!(manager.all_presets().await.len(), 6);

        assert!(matches!(
            manager.delete_user_preset("user-missing").await,
            Err(ThemingError::PresetNotFound { .. })
        ));
        manager.delete_user_preset("user-a").await.unwrap();
        assert!(manager.load_user_presets().await.is_empty());
    }

    #[tokio::test]
    async fn stored_built_in_flag_blocks_deletion() {
        let (manager, storage) = manager_with(20);
        let mut flagged = user_preset("user-flagged", "Flagged");
        flagged.metadata.is_built_in = true;
        storage
            .set(USER_PRESETS_KEY, &serde_json::to_string(&vec![flagged]).unwrap())
            .await
            .unwrap();

        assert!(manager.delete_user_preset("user-flagged").await.is_err());
        assert_eq!(manager.load_user_presets().await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_lands_in_user_bucket() {
        let (manager, _) = manager_with(20);
        let ocean = manager.get_preset("triton-ocean").await.unwrap();
        let copy = manager.duplicate_preset(&ocean, "My Ocean").await.unwrap();

        assert!(copy.id.starts_with("user-"));
        assert_eq!(copy.name, "My Ocean");
        assert_eq!(
            copy.description.as_deref(),
            Some("Light ocean-inspired theme with teal and blue tones (Copy)")
        );
        assert_eq!(copy.metadata.author.as_deref(), Some("User"));
        assert!(!copy.is_built_in());
        assert_eq!(copy.color_overrides, ocean.color_overrides);
        assert_eq!(manager.load_user_presets().await, vec![copy]);
    }

    #[tokio::test]
    async fn exported_preset_imports_as_new_user_preset() {
        let (manager, _) = manager_with(20);
        let sunset = manager.get_preset("triton-sunset").await.unwrap();
        let json = manager.export_preset(&sunset).unwrap();

        let export: PresetExport = serde_json::from_str(&json).unwrap();
        assert!(export.preset.id.starts_with("exported-"));
        assert!(!export.preset.metadata.is_built_in);
        assert_eq!(export.app_version, "1.0.0");

        let imported = manager.import_preset("sunset.json", &json).await.unwrap();
        assert!(imported.id.starts_with("user-"));
        assert_eq!(imported.name, "Sunset");
        assert_eq!(imported.base_theme, BaseTheme::Lara);
        assert_eq!(imported.color_overrides.len(), 6);
        assert!(imported.color_overrides.iter().all(|o| o.palette.is_some()));
        assert_eq!(manager.load_user_presets().await.len(), 1);
    }

    #[tokio::test]
    async fn import_rejects_malformed_files() {
        let (manager, _) = manager_with(20);

        let missing = r#"{"preset":{"name":"No overrides"}}"#;
        match manager.import_preset("broken.json", missing).await {
            Err(ThemingError::InvalidPreset { errors }) => assert_eq!(errors, vec!["Missing required fields.".to_string()]),
            other => panic!("Expected invalid preset, got {:?}", other),
        }
        assert!(matches!(
            manager.import_preset("preset.txt", "{}").await,
            Err(ThemingError::InvalidPreset { .. })
        ));
        assert!(matches!(
            manager.import_preset("preset.json", "").await,
            Err(ThemingError::InvalidPreset { .. })
        ));
        assert!(manager.load_user_presets().await.is_empty());
    }

    #[tokio::test]
    async fn load_fills_missing_palettes_and_ignores_corruption() {
        let (manager, storage) = manager_with(20);
        storage
            .set(
                USER_PRESETS_KEY,
                r##"[{"id":"user-legacy","name":"Legacy","colorOverrides":[{"tokenId":"primary","value":"#000000"}]}]"##,
            )
            .await
            .unwrap();

        let loaded = manager.load_user_presets().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].metadata.version, "1.0.0");
        assert_eq!(loaded[0].color_overrides[0].palette.as_ref().unwrap()[&500], "#000000");
        assert!(loaded[0].includes_token("primary"));

        storage.set(USER_PRESETS_KEY, "not json").await.unwrap();
        assert!(manager.load_user_presets().await.is_empty());
    }

    #[tokio::test]
    async fn quota_failure_surfaces_on_save() {
        let storage = Arc::new(MemoryKeyValueStore::with_quota(16));
        let manager = PresetManager::new(storage, 20);
        match manager.save_user_preset(user_preset("user-a", "A")).await {
            Err(ThemingError::Storage { operation, .. }) => assert_eq!(operation, "save user presets"),
            other => panic!("Expected storage error, got {:?}", other),
        }
        assert!(manager.load_user_presets().await.is_empty());
    }

    #[tokio::test]
    async fn color_update_recomputes_palette() {
        let (manager, _) = manager_with(20);
        manager.save_user_preset(user_preset("user-a", "A")).await.unwrap();

        let updated = manager.update_color_override("user-a", "primary", "#000000").await.unwrap();
        let palette = updated.color_overrides[0].palette.as_ref().unwrap();
        assert_eq!(palette[&500], "#000000");
        assert_eq!(palette[&50], "#f2f2f2");

        let added = manager.update_color_override("user-a", "text-color", "#111111").await.unwrap();
        assert_eq!(added.color_overrides.len(), 2);
        assert!(added.color_overrides[1].palette.is_none());

        assert!(manager.update_color_override("user-a", "primary", "#zzz").await.is_err());
        assert!(matches!(
            manager.update_color_override("triton-default", "primary", "#000000").await,
            Err(ThemingError::BuiltInPresetImmutable { .. })
        ));
    }

    #[tokio::test]
    async fn stats_and_clear() {
        let (manager, _) = manager_with(20);
        assert_eq!(manager.storage_stats().await.size, 0);

        manager.save_user_preset(user_preset("user-a", "A")).await.unwrap();
        let stats = manager.storage_stats().await;
        assert!(stats.size > 0);
        assert_eq!(stats.user_presets, 1);
        assert_eq!(stats.max_presets, 20);

        manager.clear_all_user_presets().await.unwrap();
        assert_eq!(manager.storage_stats().await.user_presets, 0);
    }
}
