//! Theme import: validation, parsing, conflict detection and application.

pub mod js_object;
pub mod source;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, info, warn};
use triton_core::config::ThemingConfig;

pub use self::source::{classify_archive, classify_document, Classification, ClassifiedImport, ImportSource, ImportValidation};

use self::js_object::{export_body, extract_string_pairs, header_name, parse_default_export};
use self::source::package_theme_file;
use super::export::archive::{read_archive, ArchiveFiles};
use super::export::ExportFormat;
use super::inference::{humanize_token_name, infer_token_type};
use super::preset::{PresetTokens, ThemePreset, DEFAULT_PRESET_VERSION};
use super::store::TokenStore;
use super::types::{BaseTheme, DesignToken, TokenCategory, TokenType, TokenValidation, TokenValue};

const SHAREABLE_GENERAL: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    /// Keep the registered token and drop the incoming one.
    Skip,
    /// Register the incoming token as is.
    Replace,
    /// Overlay the incoming token on the registered one, keeping its id and default value.
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    #[serde(default)]
    pub preview_only: bool,
    /// Proceed even when conflicts are found.
    #[serde(default)]
    pub resolve_conflicts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_resolution: Option<ConflictResolution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Token,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictSide {
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// An incoming token that collides with a registered one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub path: String,
    pub existing: ConflictSide,
    pub incoming: ConflictSide,
    pub recommended: ConflictResolution,
}

/// Preset fields recovered from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSkeleton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A parsed source ready to be previewed or applied.
#[derive(Debug, Clone)]
pub struct ParsedImport {
    pub format: ExportFormat,
    pub preset: PresetSkeleton,
    pub tokens: Vec<DesignToken>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub preset: PresetSkeleton,
    pub token_count: usize,
    pub conflicts: usize,
    pub new_tokens: usize,
    pub categories: Vec<TokenCategory>,
    pub components: Vec<String>,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<ThemePreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<ImportConflict>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<ImportPreview>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ImportResult {
    fn empty(success: bool) -> Self {
        Self {
            success,
            preset: None,
            imported_tokens: None,
            conflicts: None,
            preview: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn rejected(report: ImportValidation) -> Self {
        Self {
            errors: report.errors,
            warnings: report.warnings,
            ..Self::empty(false)
        }
    }
}

/// Id of an imported token: `primitive.*`, `semantic.*` and `custom.*` are prefixed
/// with their category, component tokens with their component.
fn imported_token_id(category: TokenCategory, component: Option<&str>, path: &str) -> String {
    match (category, component) {
        (TokenCategory::Component, Some(component)) => format!("{}.{}", component, path),
        _ => format!("{}.{}", category, path),
    }
}

fn imported_token(category: TokenCategory, component: Option<&str>, path: &str, value: TokenValue) -> DesignToken {
    let token_type = infer_token_type(path, &value);
    let label = humanize_token_name(path.rsplit('.').next().unwrap_or(path));
    let subcategory = match component {
        Some(component) => component.to_string(),
        None => path.split('.').next().unwrap_or(path).to_string(),
    };
    let mut token = DesignToken::new(imported_token_id(category, component, path), category, path, value, token_type)
        .with_label(label)
        .with_subcategory(subcategory)
        .with_description(format!("Imported token: {}", path));
    if let Some(component) = component {
        token = token.with_affects([component]);
    }
    token
}

fn collect_leaves(value: &Value, prefix: &str, out: &mut Vec<(String, TokenValue)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() { key.clone() } else { format!("{}.{}", prefix, key) };
                collect_leaves(child, &path, out);
            }
        }
        other => {
            if let (false, Some(token_value)) = (prefix.is_empty(), TokenValue::from_json(other)) {
                out.push((prefix.to_string(), token_value));
            }
        }
    }
}

/// Tokens of a parsed theme object with `primitive`, `semantic`, `components` and
/// `custom` sections. Other top-level keys become custom tokens.
fn tokens_from_theme_object(theme: &Value) -> Vec<DesignToken> {
    let mut tokens = Vec::new();
    let Some(sections) = theme.as_object() else {
        return tokens;
    };

    for (section, tree) in sections {
        let mut leaves = Vec::new();
        match section.as_str() {
            "components" => {
                if let Some(components) = tree.as_object() {
                    for (component, component_tree) in components {
                        let mut component_leaves = Vec::new();
                        collect_leaves(component_tree, "", &mut component_leaves);
                        tokens.extend(component_leaves.into_iter().map(|(path, value)| {
                            imported_token(TokenCategory::Component, Some(component.as_str()), &path, value)
                        }));
                    }
                }
                continue;
            }
            "primitive" | "semantic" | "custom" => collect_leaves(tree, "", &mut leaves),
            other => collect_leaves(tree, other, &mut leaves),
        }
        let category: TokenCategory = section.parse().unwrap_or(TokenCategory::Custom);
        tokens.extend(
            leaves
                .into_iter()
                .map(|(path, value)| imported_token(category, None, &path, value)),
        );
    }
    tokens
}

/// Tokens recovered by pattern matching, classified by their dotted key.
fn tokens_from_pairs(pairs: Vec<(String, String)>) -> Vec<DesignToken> {
    pairs
        .into_iter()
        .map(|(key, value)| {
            let value = TokenValue::Text(value);
            if let Some(path) = key.strip_prefix("primitive.") {
                imported_token(TokenCategory::Primitive, None, path, value)
            } else if let Some(path) = key.strip_prefix("semantic.") {
                imported_token(TokenCategory::Semantic, None, path, value)
            } else if let Some((component, path)) = key.strip_prefix("components.").and_then(|rest| rest.split_once('.')) {
                imported_token(TokenCategory::Component, Some(component), path, value)
            } else {
                imported_token(TokenCategory::Custom, None, &key, value)
            }
        })
        .collect()
}

/// Parses a theme module, degrading to pattern matching and finally to no tokens.
fn parse_theme_js(content: &str, warnings: &mut Vec<String>) -> Vec<DesignToken> {
    match parse_default_export(content) {
        Ok(theme) => tokens_from_theme_object(&theme),
        Err(e) => {
            warn!("Failed to parse theme object ({}); falling back to pattern extraction", e);
            let tokens = tokens_from_pairs(extract_string_pairs(export_body(content)));
            if tokens.is_empty() {
                warnings.push(format!("theme.js could not be parsed ({}); no tokens were imported", e));
            } else {
                warnings.push(format!(
                    "theme.js could not be parsed ({}); {} tokens were recovered by pattern matching",
                    e,
                    tokens.len()
                ));
            }
            tokens
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn shareable_token(category: TokenCategory, subcategory: &str, path: &str, entry: &Value, warnings: &mut Vec<String>) -> Option<DesignToken> {
    let Some(value) = entry.get("value").and_then(TokenValue::from_json) else {
        warnings.push(format!("Token '{}' in {}.{} has no value and was skipped", path, category, subcategory));
        return None;
    };
    let component = (category == TokenCategory::Component).then_some(subcategory);
    let id = string_field(entry, "id").unwrap_or_else(|| imported_token_id(category, component, path));
    let token_type = entry
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<TokenType>().ok())
        .unwrap_or_else(|| infer_token_type(path, &value));

    let mut token = DesignToken::new(id, category, path, value, token_type)
        .with_label(humanize_token_name(path.rsplit('.').next().unwrap_or(path)))
        .with_description(
            string_field(entry, "description").unwrap_or_else(|| format!("Imported {} token", category)),
        );
    if subcategory != SHAREABLE_GENERAL {
        token = token.with_subcategory(subcategory);
    }
    if let Some(component) = component {
        token = token.with_affects([component]);
    }
    if let Some(validation) = entry.get("validation").filter(|v| !v.is_null()) {
        match serde_json::from_value::<TokenValidation>(validation.clone()) {
            Ok(validation) => token = token.with_validation(validation),
            Err(e) => warnings.push(format!("Ignoring invalid validation rule of '{}': {}", token.id, e)),
        }
    }
    Some(token)
}

fn parse_shareable(data: &Value) -> ParsedImport {
    let mut warnings = Vec::new();
    let mut tokens = Vec::new();

    if let Some(categories) = data.get("tokens").and_then(Value::as_object) {
        for (category_name, subcategories) in categories {
            let Ok(category) = category_name.parse::<TokenCategory>() else {
                warnings.push(format!("Unknown token category '{}' was skipped", category_name));
                continue;
            };
            for (subcategory, paths) in subcategories.as_object().into_iter().flatten() {
                for (path, entry) in paths.as_object().into_iter().flatten() {
                    tokens.extend(shareable_token(category, subcategory, path, entry, &mut warnings));
                }
            }
        }
    }

    let metadata = data.get("metadata");
    ParsedImport {
        format: ExportFormat::Shareable,
        preset: PresetSkeleton {
            name: string_field(data, "name"),
            description: string_field(data, "description"),
            tags: string_list(data.get("tags")),
            version: string_field(data, "version"),
            author: metadata.and_then(|m| string_field(m, "author")),
        },
        tokens,
        warnings,
    }
}

fn parse_package(files: &ArchiveFiles) -> ParsedImport {
    let mut warnings = Vec::new();
    let package: Value = files
        .get("package.json")
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(Value::Null);
    let tokens = package_theme_file(files)
        .map(|content| parse_theme_js(content, &mut warnings))
        .unwrap_or_default();

    ParsedImport {
        format: ExportFormat::Package,
        preset: PresetSkeleton {
            name: string_field(&package, "name"),
            description: string_field(&package, "description"),
            tags: Vec::new(),
            version: string_field(&package, "version"),
            author: string_field(&package, "author"),
        },
        tokens,
        warnings,
    }
}

fn parse_primevue(files: &ArchiveFiles) -> ParsedImport {
    let mut warnings = Vec::new();
    let content = files.get("theme.js").map(String::as_str).unwrap_or_default();
    let tokens = parse_theme_js(content, &mut warnings);
    ParsedImport {
        format: ExportFormat::Primevue,
        preset: PresetSkeleton {
            name: header_name(content),
            ..Default::default()
        },
        tokens,
        warnings,
    }
}

/// Turns a classified source into tokens and a preset skeleton.
pub fn parse_classified(import: &ClassifiedImport) -> ParsedImport {
    match import {
        ClassifiedImport::Shareable(data) => parse_shareable(data),
        ClassifiedImport::Package(files) => parse_package(files),
        ClassifiedImport::Primevue(files) => parse_primevue(files),
    }
}

type ScopedPath<'a> = (TokenCategory, Option<&'a str>, &'a str);

/// Registered tokens by id and by path within their category and subcategory.
struct ConflictIndex<'a> {
    store: &'a TokenStore,
    by_path: HashMap<ScopedPath<'a>, &'a DesignToken>,
}

impl<'a> ConflictIndex<'a> {
    fn new(store: &'a TokenStore) -> Self {
        let by_path = store
            .get_all_tokens()
            .into_iter()
            .map(|t| ((t.category, t.subcategory.as_deref(), t.path.as_str()), t))
            .collect();
        Self { store, by_path }
    }

    fn existing(&self, incoming: &DesignToken) -> Option<&'a DesignToken> {
        self.store.get_token(incoming.id.as_str()).or_else(|| {
            self.by_path
                .get(&(incoming.category, incoming.subcategory.as_deref(), incoming.path.as_str()))
                .copied()
        })
    }
}

/// One conflict per incoming token that matches a registered token by id, or by
/// path within the same category and subcategory.
pub fn detect_conflicts(store: &TokenStore, tokens: &[DesignToken]) -> Vec<ImportConflict> {
    let index = ConflictIndex::new(store);
    tokens
        .iter()
        .filter_map(|incoming| {
            index.existing(incoming).map(|existing| ImportConflict {
                kind: ConflictKind::Token,
                path: incoming.path.clone(),
                existing: ConflictSide {
                    value: existing.value.clone(),
                    token_type: existing.token_type,
                },
                incoming: ConflictSide {
                    value: incoming.value.clone(),
                    token_type: incoming.token_type,
                },
                recommended: ConflictResolution::Replace,
            })
        })
        .collect()
}

fn merge_tokens(existing: &DesignToken, incoming: DesignToken) -> DesignToken {
    DesignToken {
        id: existing.id.clone(),
        default_value: existing.default_value.clone(),
        subcategory: incoming.subcategory.or_else(|| existing.subcategory.clone()),
        description: incoming.description.or_else(|| existing.description.clone()),
        affects: if incoming.affects.is_empty() { existing.affects.clone() } else { incoming.affects },
        dependencies: if incoming.dependencies.is_empty() {
            existing.dependencies.clone()
        } else {
            incoming.dependencies
        },
        validation: incoming.validation.or_else(|| existing.validation.clone()),
        metadata: incoming.metadata.or_else(|| existing.metadata.clone()),
        ..incoming
    }
}

/// Validates, parses and applies theme imports.
#[derive(Debug, Clone)]
pub struct ThemeImporter {
    max_file_size: u64,
    archive_timeout: Duration,
}

impl ThemeImporter {
    pub fn new(max_file_size: u64, archive_timeout: Duration) -> Self {
        Self {
            max_file_size,
            archive_timeout,
        }
    }

    pub fn from_config(config: &ThemingConfig) -> Self {
        Self::new(config.max_import_size_bytes, config.archive_timeout())
    }

    /// Determines the format of `source` and checks it.
    pub async fn classify(&self, source: ImportSource) -> Classification {
        match source {
            ImportSource::Object(data) => classify_document(data),
            ImportSource::Json(text) => match serde_json::from_str(&text) {
                Ok(data) => classify_document(data),
                Err(_) => Classification::rejected("Invalid JSON format"),
            },
            ImportSource::File { name, bytes } => self.classify_file(&name, bytes).await,
        }
    }

    async fn classify_file(&self, name: &str, bytes: Vec<u8>) -> Classification {
        if bytes.len() as u64 > self.max_file_size {
            return Classification::rejected(format!(
                "File too large (max {}MB)",
                self.max_file_size / (1024 * 1024)
            ));
        }

        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".json") {
            match serde_json::from_slice(&bytes) {
                Ok(data) => classify_document(data),
                Err(_) => Classification::rejected("Invalid JSON file"),
            }
        } else if lower.ends_with(".zip") {
            match read_archive(bytes, self.archive_timeout, self.max_file_size).await {
                Ok(files) => classify_archive(files),
                Err(e) => {
                    debug!("Could not read archive '{}': {}", name, e);
                    Classification::rejected(format!("Invalid ZIP file: {}", e))
                }
            }
        } else {
            Classification::rejected("Unsupported file format. Use .json or .zip files.")
        }
    }

    pub async fn validate_import(&self, source: &ImportSource) -> ImportValidation {
        self.classify(source.clone()).await.report
    }

    /// Classifies and parses `source`. A rejected source yields its validation report.
    pub async fn prepare(&self, source: ImportSource) -> Result<ParsedImport, ImportValidation> {
        let classification = self.classify(source).await;
        match classification.import {
            Some(import) => {
                let mut parsed = parse_classified(&import);
                let mut warnings = classification.report.warnings;
                warnings.append(&mut parsed.warnings);
                parsed.warnings = warnings;
                Ok(parsed)
            }
            None => Err(classification.report),
        }
    }

    pub fn preview(&self, store: &TokenStore, parsed: &ParsedImport) -> ImportPreview {
        let conflicts = detect_conflicts(store, &parsed.tokens).len();
        let categories: BTreeSet<TokenCategory> = parsed.tokens.iter().map(|t| t.category).collect();
        let components: BTreeSet<&str> = parsed.tokens.iter().filter_map(|t| t.component()).collect();
        ImportPreview {
            preset: parsed.preset.clone(),
            token_count: parsed.tokens.len(),
            conflicts,
            new_tokens: parsed.tokens.len() - conflicts,
            categories: categories.into_iter().collect(),
            components: components.into_iter().map(str::to_string).collect(),
            format: parsed.format,
        }
    }

    /// Previews or registers a parsed import according to `options`.
    pub fn apply(&self, store: &mut TokenStore, parsed: ParsedImport, options: &ImportOptions) -> ImportResult {
        if options.preview_only {
            return ImportResult {
                preview: Some(self.preview(store, &parsed)),
                warnings: parsed.warnings,
                ..ImportResult::empty(true)
            };
        }

        let conflicts = detect_conflicts(store, &parsed.tokens);
        if !conflicts.is_empty() && !options.resolve_conflicts {
            info!("Import halted: {} conflicts need a resolution", conflicts.len());
            return ImportResult {
                conflicts: Some(conflicts),
                warnings: parsed.warnings,
                message: Some("Conflicts detected. Please resolve them before importing.".to_string()),
                ..ImportResult::empty(false)
            };
        }

        let mut warnings = parsed.warnings;
        let mut preset_tokens = BTreeMap::new();
        for token in parsed.tokens {
            let existing = store.get_token(token.id.as_str());
            let token = match (options.conflict_resolution, existing) {
                (Some(ConflictResolution::Skip), Some(_)) => continue,
                (Some(ConflictResolution::Merge), Some(existing)) => merge_tokens(existing, token),
                _ => token,
            };
            let id = token.id.to_string();
            let value = token.value.to_json();
            match store.register(token) {
                Ok(()) => {
                    preset_tokens.insert(id, value);
                }
                Err(e) => {
                    warn!("Failed to register imported token {}: {}", id, e);
                    warnings.push(format!("Failed to register token {}: {}", id, e));
                }
            }
        }

        let preset = self.build_preset(parsed.preset, preset_tokens);
        let imported = preset.tokens.as_ref().map_or(0, PresetTokens::len);
        info!("Imported {} tokens into preset '{}'", imported, preset.id);
        ImportResult {
            preset: Some(preset),
            imported_tokens: Some(imported),
            conflicts: (!conflicts.is_empty()).then_some(conflicts),
            warnings,
            message: Some(format!("Imported {} tokens", imported)),
            ..ImportResult::empty(true)
        }
    }

    fn build_preset(&self, skeleton: PresetSkeleton, tokens: BTreeMap<String, Value>) -> ThemePreset {
        let now = Utc::now();
        let tags = if skeleton.tags.is_empty() {
            vec!["imported".to_string()]
        } else {
            skeleton.tags
        };
        let mut preset = ThemePreset::new(
            format!("imported_{}", now.timestamp_millis()),
            skeleton.name.unwrap_or_else(|| "Imported Theme".to_string()),
            BaseTheme::Aura,
        );
        preset.description = Some(skeleton.description.unwrap_or_else(|| "Imported theme".to_string()));
        preset.tags = tags.clone();
        preset.tokens = Some(PresetTokens::Flat(tokens));
        preset.metadata.created = now;
        preset.metadata.modified = now;
        preset.metadata.author = skeleton.author;
        preset.metadata.version = skeleton.version.unwrap_or_else(|| DEFAULT_PRESET_VERSION.to_string());
        preset.metadata.tags = tags;
        preset
    }

    /// Validates, parses and applies `source` in one step.
    pub async fn import_theme(&self, store: &mut TokenStore, source: ImportSource, options: &ImportOptions) -> ImportResult {
        match self.prepare(source).await {
            Ok(parsed) => self.apply(store, parsed, options),
            Err(report) => ImportResult::rejected(report),
        }
    }
}
