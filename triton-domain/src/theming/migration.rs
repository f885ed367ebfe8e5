//! Conversion from the legacy color-token model.
//!
//! Legacy presets only carry `colorOverrides` keyed by the editable color ids
//! (`primary`, `surface-50`, `text-color`, ...). Migration builds the categorized
//! `tokens` structure next to them and leaves the overrides in place.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use super::preset::{ColorOverride, PresetTokens, StructuredTokens, ThemePreset};
use super::types::{DesignToken, TokenCategory, TokenMetadata, TokenType};

/// A color token of the legacy five-category model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyColorToken {
    pub id: String,
    pub label: String,
    /// `brand`, `status`, `surface`, `text` or `interaction`.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub css_variable: String,
    pub default_value: String,
}

const EDITABLE_COLORS: &[(&str, &str, &str, &str, &str)] = &[
    ("primary", "Primary (Navy)", "brand", "Main brand color used for primary actions and CTA buttons", "#0B2244"),
    ("secondary", "Secondary (Accent Blue)", "brand", "Accent color for secondary elements and information", "#297FB7"),
    ("success", "Success", "status", "Success states, confirmations, and positive actions", "#10B981"),
    ("info", "Info", "status", "Informational messages and neutral states", "#297FB7"),
    ("warning", "Warning", "status", "Warning states, alerts, and caution messages", "#FFB400"),
    ("danger", "Danger/Emergency", "status", "Error states, destructive actions, and critical alerts", "#F60D03"),
    ("surface-0", "Surface 0 (Background)", "surface", "Main background color - lightest surface", "#ffffff"),
    ("surface-50", "Surface 50", "surface", "Very light surface for subtle backgrounds", "#fafafa"),
    ("surface-100", "Surface 100", "surface", "Light surface for card backgrounds", "#f5f5f5"),
    ("surface-200", "Surface 200", "surface", "Light surface for borders and dividers", "#e5e5e5"),
    ("surface-300", "Surface 300", "surface", "Medium-light surface", "#d4d4d4"),
    ("surface-400", "Surface 400", "surface", "Medium surface for disabled states", "#a3a3a3"),
    ("surface-500", "Surface 500", "surface", "Mid-tone surface", "#737373"),
    ("surface-600", "Surface 600", "surface", "Medium-dark surface", "#525252"),
    ("surface-700", "Surface 700", "surface", "Dark surface for secondary text", "#404040"),
    ("surface-800", "Surface 800", "surface", "Dark surface for dark mode cards", "#262626"),
    ("surface-900", "Surface 900", "surface", "Very dark surface for dark mode", "#171717"),
    ("surface-950", "Surface 950", "surface", "Darkest surface for dark mode backgrounds", "#0a0a0a"),
    ("text-color", "Primary Text", "text", "Main body text color", "#374151"),
    ("text-muted", "Muted Text", "text", "Secondary and helper text", "#6B7280"),
    ("text-hover", "Hover Text", "text", "Text color on hover", "#1F2937"),
    ("focus-ring", "Focus Ring", "interaction", "Keyboard focus outline color", "#297FB7"),
    ("border-color", "Border", "interaction", "Default border color", "#E5E7EB"),
    ("border-hover", "Border Hover", "interaction", "Border color on hover", "#D1D5DB"),
    ("highlight-bg", "Highlight Background", "interaction", "Selected and highlighted item background", "#EBF4FF"),
    ("overlay-bg", "Overlay Background", "interaction", "Modal and dialog backdrop", "rgba(0, 0, 0, 0.4)"),
];

/// The editable colors of the legacy model, in display order.
pub fn editable_color_tokens() -> Vec<LegacyColorToken> {
    EDITABLE_COLORS
        .iter()
        .map(|(id, label, category, description, default_value)| LegacyColorToken {
            id: id.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            description: Some(description.to_string()),
            css_variable: format!("--p-{}", if id.starts_with("surface") { id.to_string() } else { format!("{}-color", id) }),
            default_value: default_value.to_string(),
        })
        .collect()
}

pub fn is_editable_color(id: &str) -> bool {
    EDITABLE_COLORS.iter().any(|(known, ..)| *known == id)
}

fn legacy_category(category: &str) -> TokenCategory {
    match category {
        "brand" | "status" | "text" | "interaction" => TokenCategory::Semantic,
        "surface" => TokenCategory::Primitive,
        _ => TokenCategory::Custom,
    }
}

/// `surface-0` → `Surface 0`. Only the first letter of each part is raised.
fn humanize_token_id(id: &str) -> String {
    id.split(|c| c == '-' || c == '.')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn color_token_to_design_token(color_token: &LegacyColorToken) -> DesignToken {
    let mut token = DesignToken::new(
        color_token.id.clone(),
        legacy_category(&color_token.category),
        color_token.id.replace('-', "."),
        color_token.default_value.clone(),
        TokenType::Color,
    )
    .with_label(color_token.label.clone())
    .with_subcategory(color_token.category.clone());
    token.description = color_token.description.clone();
    token.metadata = Some(TokenMetadata {
        added: Some(Utc::now()),
        ..Default::default()
    });
    token
}

pub fn migrate_color_tokens(color_tokens: &[LegacyColorToken]) -> Vec<DesignToken> {
    color_tokens.iter().map(color_token_to_design_token).collect()
}

/// Classifies an override by keywords in its id.
pub fn color_override_to_design_token(color_override: &ColorOverride) -> DesignToken {
    let id = color_override.token_id.as_str();
    let has = |needle: &str| id.contains(needle);
    let (category, subcategory) = if has("primary") || has("secondary") {
        (TokenCategory::Semantic, Some("brand"))
    } else if has("success") || has("warning") || has("danger") || has("info") {
        (TokenCategory::Semantic, Some("status"))
    } else if has("surface") {
        (TokenCategory::Primitive, Some("surface"))
    } else {
        (TokenCategory::Custom, None)
    };

    let mut token = DesignToken::new(id, category, id.replace('-', "."), color_override.value.clone(), TokenType::Color)
        .with_label(humanize_token_id(id));
    token.subcategory = subcategory.map(str::to_string);
    token
}

/// Adds the categorized `tokens` structure built from `colorOverrides`.
///
/// A preset that already has `tokens` is returned borrowed and unchanged, so
/// migrating twice is the same as migrating once.
pub fn migrate_theme_preset(preset: &ThemePreset) -> Cow<'_, ThemePreset> {
    if preset.tokens.is_some() {
        return Cow::Borrowed(preset);
    }

    let structured = StructuredTokens::from_tokens(preset.color_overrides.iter().map(color_override_to_design_token));
    let mut migrated = preset.clone();
    migrated.tokens = Some(PresetTokens::Structured(structured));
    Cow::Owned(migrated)
}

/// Maps legacy ids (`surface-50`) to dotted ids (`surface.50`).
pub fn create_token_mapping(old_tokens: &[LegacyColorToken]) -> BTreeMap<String, String> {
    old_tokens
        .iter()
        .map(|t| (t.id.clone(), t.id.replace('-', ".")))
        .collect()
}

/// Lists every mismatch between `original` and its migration. Empty means valid.
pub fn validate_migration(original: &ThemePreset, migrated: &ThemePreset) -> Vec<String> {
    let mut errors = Vec::new();

    let original_count = original.color_overrides.len();
    let migrated_count = migrated.tokens.as_ref().map_or(0, PresetTokens::len);
    if original_count != migrated_count {
        errors.push(format!(
            "Token count mismatch: {} original vs {} migrated",
            original_count, migrated_count
        ));
    }

    if original.metadata != migrated.metadata {
        errors.push("Metadata not preserved during migration".to_string());
    }
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCounts {
    pub original: usize,
    pub migrated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetMigrationErrors {
    pub preset_id: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub total_presets: usize,
    pub successful_migrations: usize,
    pub failed_migrations: usize,
    pub token_counts: TokenCounts,
    pub errors: Vec<PresetMigrationErrors>,
}

/// Summarizes a batch migration. `migrated[i]` is the migration of `original[i]`.
pub fn generate_migration_report(original: &[ThemePreset], migrated: &[ThemePreset]) -> MigrationReport {
    let mut report = MigrationReport {
        total_presets: original.len(),
        ..Default::default()
    };

    for (index, preset) in original.iter().enumerate() {
        report.token_counts.original += preset.color_overrides.len();

        let errors = match migrated.get(index) {
            Some(migrated_preset) => {
                report.token_counts.migrated += migrated_preset.tokens.as_ref().map_or(0, PresetTokens::len);
                validate_migration(preset, migrated_preset)
            }
            None => vec!["Migrated preset missing".to_string()],
        };

        if errors.is_empty() {
            report.successful_migrations += 1;
        } else {
            report.failed_migrations += 1;
            report.errors.push(PresetMigrationErrors {
                preset_id: preset.id.clone(),
                errors,
            });
        }
    }
    report
}
