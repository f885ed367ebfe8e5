//! Persisted theme presets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::types::{BaseTheme, DesignToken, TokenCategory};

pub const DEFAULT_PRESET_VERSION: &str = "1.0.0";

fn default_version() -> String {
    DEFAULT_PRESET_VERSION.to_string()
}

/// Legacy per-color override. Brand and status colors carry a derived shade palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOverride {
    pub token_id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<BTreeMap<u16, String>>,
}

impl ColorOverride {
    pub fn new(token_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            value: value.into(),
            palette: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetMetadata {
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_built_in: bool,
}

impl Default for PresetMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created: now,
            modified: now,
            author: None,
            version: default_version(),
            tags: Vec::new(),
            is_default: false,
            is_built_in: false,
        }
    }
}

/// Tokens of a preset laid out by category; component tokens are nested by component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredTokens {
    #[serde(default)]
    pub primitive: BTreeMap<String, DesignToken>,
    #[serde(default)]
    pub semantic: BTreeMap<String, DesignToken>,
    #[serde(default)]
    pub component: BTreeMap<String, BTreeMap<String, DesignToken>>,
    #[serde(default)]
    pub custom: BTreeMap<String, DesignToken>,
}

impl StructuredTokens {
    pub fn from_tokens<I: IntoIterator<Item = DesignToken>>(tokens: I) -> Self {
        let mut structured = Self::default();
        for token in tokens {
            structured.insert(token);
        }
        structured
    }

    pub fn insert(&mut self, token: DesignToken) {
        let key = token.id.to_string();
        match token.category {
            TokenCategory::Primitive => {
                self.primitive.insert(key, token);
            }
            TokenCategory::Semantic => {
                self.semantic.insert(key, token);
            }
            TokenCategory::Custom => {
                self.custom.insert(key, token);
            }
            TokenCategory::Component => {
                let component = token.subcategory.clone().unwrap_or_default();
                self.component.entry(component).or_default().insert(key, token);
            }
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &DesignToken> + '_ {
        self.primitive
            .values()
            .chain(self.semantic.values())
            .chain(self.component.values().flat_map(BTreeMap::values))
            .chain(self.custom.values())
    }

    pub fn len(&self) -> usize {
        self.primitive.len()
            + self.semantic.len()
            + self.component.values().map(BTreeMap::len).sum::<usize>()
            + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.primitive.contains_key(id)
            || self.semantic.contains_key(id)
            || self.custom.contains_key(id)
            || self.component.values().any(|tokens| tokens.contains_key(id))
    }
}

/// The `tokens` field of a preset: either the structured layout or a free-form map
/// keyed by token id, as found in hand-edited and older files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetTokens {
    Structured(StructuredTokens),
    Flat(BTreeMap<String, Value>),
}

impl PresetTokens {
    pub fn empty() -> Self {
        PresetTokens::Structured(StructuredTokens::default())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        match self {
            PresetTokens::Structured(structured) => structured.contains_id(id),
            PresetTokens::Flat(map) => map.contains_key(id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PresetTokens::Structured(structured) => structured.len(),
            PresetTokens::Flat(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreset {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub base_theme: BaseTheme,
    #[serde(default)]
    pub color_overrides: Vec<ColorOverride>,
    /// Legacy override map keyed by token id with `_` in place of `.`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<PresetTokens>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: PresetMetadata,
}

impl ThemePreset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_theme: BaseTheme) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            base_theme,
            color_overrides: Vec::new(),
            overrides: None,
            tokens: None,
            tags: Vec::new(),
            metadata: PresetMetadata::default(),
        }
    }

    pub fn is_built_in(&self) -> bool {
        self.metadata.is_built_in
    }

    /// Whether the registry token `id` belongs to this preset.
    pub fn includes_token(&self, id: &str) -> bool {
        if self.tokens.as_ref().is_some_and(|t| t.contains_id(id)) {
            return true;
        }
        self.overrides
            .as_ref()
            .is_some_and(|overrides| overrides.contains_key(&id.replace('.', "_")))
    }
}

/// File format of a single exported preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetExport {
    pub preset: ThemePreset,
    pub export_date: DateTime<Utc>,
    pub app_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theming::types::TokenType;
    use serde_json::json;

    #[test]
    fn legacy_preset_without_metadata_gets_defaults() {
        let preset: ThemePreset = serde_json::from_value(json!({
            "id": "user-1",
            "name": "Mine",
            "baseTheme": "Lara",
            "colorOverrides": [{ "tokenId": "primary", "value": "#0B2244" }]
        }))
        .unwrap();
        assert_eq!(preset.base_theme, BaseTheme::Lara);
        assert_eq!(preset.metadata.version, "1.0.0");
        assert!(!preset.is_built_in());
        assert!(preset.tokens.is_none());
    }

    #[test]
    fn palette_keys_round_trip_as_strings() {
        let mut palette = BTreeMap::new();
        palette.insert(500, "#0b2244".to_string());
        let override_ = ColorOverride { palette: Some(palette), ..ColorOverride::new("primary", "#0b2244") };
        let json = serde_json::to_value(&override_).unwrap();
        assert_eq!(json["palette"]["500"], "#0b2244");
        assert_eq!(serde_json::from_value::<ColorOverride>(json).unwrap(), override_);
    }

    #[test]
    fn tokens_field_accepts_structured_and_flat_shapes() {
        let structured: PresetTokens = serde_json::from_value(json!({ "primitive": {}, "semantic": {} })).unwrap();
        assert!(matches!(structured, PresetTokens::Structured(_)));

        let flat: PresetTokens = serde_json::from_value(json!({ "button.background": "#fff" })).unwrap();
        assert!(matches!(flat, PresetTokens::Flat(_)));
        assert!(flat.contains_id("button.background"));
    }

    #[test]
    fn includes_token_checks_tokens_then_legacy_overrides() {
        let token = DesignToken::new("button.background", TokenCategory::Component, "background", "#fff", TokenType::Color)
            .with_subcategory("button");
        let mut preset = ThemePreset::new("p", "P", BaseTheme::Aura);
        preset.tokens = Some(PresetTokens::Structured(StructuredTokens::from_tokens([token])));
        preset.overrides = Some(BTreeMap::from([("semantic_primary_500".to_string(), json!("#123456"))]));

        assert!(preset.includes_token("button.background"));
        assert!(preset.includes_token("semantic.primary.500"));
        assert!(!preset.includes_token("button.color"));
    }
}
