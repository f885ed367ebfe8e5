//! Theme export in three formats.
//!
//! - `primevue`: a zip with `theme.js` and optional per-component modules, type
//!   definitions and documentation.
//! - `package`: a zip laid out as an installable npm package.
//! - `shareable`: a single JSON document grouping tokens by category and subcategory.
//!
//! Every call to [`ThemeExporter::export_theme`] yields an [`ExportResult`]; failures
//! are reported in the result rather than returned as errors.

pub mod archive;
mod templates;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use self::archive::{build_archive, ArchiveFiles};
use self::templates::ExportContext;
use super::errors::ThemingError;
use super::preset::ThemePreset;
use super::store::TokenStore;
use super::types::DesignToken;

pub const EXPORTED_BY: &str = "Triton Theme System";
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";
pub const DEFAULT_PACKAGE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Primevue,
    Package,
    Shareable,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Primevue => "primevue",
            ExportFormat::Package => "package",
            ExportFormat::Shareable => "shareable",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ThemingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primevue" => Ok(ExportFormat::Primevue),
            "package" => Ok(ExportFormat::Package),
            "shareable" => Ok(ExportFormat::Shareable),
            other => Err(ThemingError::UnsupportedFormat { format: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimevueOptions {
    #[serde(default)]
    pub include_type_definitions: bool,
    #[serde(default)]
    pub include_documentation: bool,
    #[serde(default)]
    pub component_separation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOptions {
    #[serde(rename = "packageName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub include_example: bool,
    #[serde(default)]
    pub include_tests: bool,
}

impl PackageOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_PACKAGE_VERSION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareableOptions {
    #[serde(default)]
    pub include_metadata: bool,
    /// Emit minified JSON.
    #[serde(default)]
    pub compressed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub primevue: PrimevueOptions,
    /// Required for the package format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageOptions>,
    #[serde(default)]
    pub shareable: ShareableOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: DateTime<Utc>,
    pub exported_by: String,
    pub version: String,
    pub format: ExportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ExportMetadata {
    pub fn new(format: ExportFormat, description: Option<String>, tags: Vec<String>, exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            exported_by: EXPORTED_BY.to_string(),
            version: EXPORT_SCHEMA_VERSION.to_string(),
            format,
            description,
            tags,
        }
    }
}

/// Outcome of an export. On success `contents` holds the artifact bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub success: bool,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub contents: Option<Vec<u8>>,
}

impl ExportResult {
    fn failure(format: &str, error: &ThemingError) -> Self {
        Self {
            success: false,
            format: format.to_string(),
            filename: None,
            size: None,
            timestamp: Utc::now(),
            error: Some(error.to_string()),
            package_name: None,
            version: None,
            warnings: Vec::new(),
            contents: None,
        }
    }
}

struct Artifact {
    filename: String,
    bytes: Vec<u8>,
    package: Option<(String, String)>,
}

/// Serializes presets and their registry tokens.
#[derive(Debug, Clone)]
pub struct ThemeExporter {
    archive_timeout: Duration,
}

impl ThemeExporter {
    pub fn new(archive_timeout: Duration) -> Self {
        Self { archive_timeout }
    }

    /// Registry tokens that belong to `preset`, ordered by id.
    pub fn preset_tokens(store: &TokenStore, preset: &ThemePreset) -> Vec<DesignToken> {
        store
            .get_all_tokens()
            .into_iter()
            .filter(|token| preset.includes_token(token.id.as_str()))
            .cloned()
            .collect()
    }

    /// Exports `preset` in the format named by `format`.
    ///
    /// Unknown formats, a missing or empty package name and archive failures are
    /// reported as an unsuccessful result.
    pub async fn export_theme(&self, store: &TokenStore, preset: &ThemePreset, format: &str, options: &ExportOptions) -> ExportResult {
        let format_kind = match format.parse::<ExportFormat>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Export of preset '{}' rejected: {}", preset.id, e);
                return ExportResult::failure(format, &e);
            }
        };

        let mut warnings = Vec::new();
        if preset.tokens.is_none() && preset.overrides.is_none() {
            warnings.push(format!("Preset '{}' defines no tokens; the export is empty", preset.name));
        }
        let tokens = Self::preset_tokens(store, preset);
        debug!("Exporting {} tokens of preset '{}' as {}", tokens.len(), preset.id, format_kind);

        let metadata = ExportMetadata::new(format_kind, preset.description.clone(), preset.tags.clone(), Utc::now());
        let ctx = ExportContext {
            preset,
            tokens: &tokens,
            metadata: &metadata,
        };

        let artifact = match format_kind {
            ExportFormat::Primevue => self.export_primevue(&ctx, &options.primevue).await,
            ExportFormat::Package => match &options.package {
                Some(package) => self.export_package(&ctx, package).await,
                None => Err(ThemingError::PackageOptionsRequired),
            },
            ExportFormat::Shareable => export_shareable(&ctx, &options.shareable),
        };

        match artifact {
            Ok(artifact) => {
                info!("Exported preset '{}' to {} ({} bytes)", preset.id, artifact.filename, artifact.bytes.len());
                let (package_name, version) = artifact.package.unzip();
                ExportResult {
                    success: true,
                    format: format_kind.to_string(),
                    filename: Some(artifact.filename),
                    size: Some(artifact.bytes.len()),
                    timestamp: Utc::now(),
                    error: None,
                    package_name,
                    version,
                    warnings,
                    contents: Some(artifact.bytes),
                }
            }
            Err(e) => {
                warn!("Export of preset '{}' as {} failed: {}", preset.id, format_kind, e);
                let mut result = ExportResult::failure(format_kind.as_str(), &e);
                result.warnings = warnings;
                result
            }
        }
    }

    async fn export_primevue(&self, ctx: &ExportContext<'_>, options: &PrimevueOptions) -> Result<Artifact, ThemingError> {
        let mut files = ArchiveFiles::new();
        files.insert("theme.js".into(), templates::theme_js(ctx));
        if options.component_separation {
            for (name, content) in templates::component_files(ctx) {
                files.insert(format!("components/{}", name), content);
            }
        }
        if options.include_type_definitions {
            files.insert("theme.d.ts".into(), templates::type_definitions(ctx));
        }
        if options.include_documentation {
            files.insert("README.md".into(), templates::readme(ctx, None));
            files.insert("TOKENS.md".into(), templates::token_documentation(ctx));
        }

        let bytes = build_archive(files, self.archive_timeout).await?;
        Ok(Artifact {
            filename: format!("{}-primevue-theme.zip", ctx.preset.name),
            bytes,
            package: None,
        })
    }

    async fn export_package(&self, ctx: &ExportContext<'_>, options: &PackageOptions) -> Result<Artifact, ThemingError> {
        if options.name.trim().is_empty() {
            return Err(ThemingError::PackageNameRequired);
        }

        let theme = templates::theme_js(ctx);
        let types = templates::type_definitions(ctx);
        let package_json = serde_json::to_string_pretty(&templates::package_json(ctx, options))?;

        let mut files = ArchiveFiles::new();
        files.insert("package.json".into(), package_json);
        files.insert("src/theme.js".into(), theme.clone());
        files.insert("dist/theme.js".into(), theme);
        for (name, content) in templates::component_files(ctx) {
            files.insert(format!("src/components/{}", name), content);
        }
        files.insert("index.js".into(), templates::package_index(ctx, "./src/theme.js", "./src/components"));
        files.insert("src/index.js".into(), templates::package_index(ctx, "./theme.js", "./components"));
        files.insert("index.d.ts".into(), types.clone());
        files.insert("dist/theme.d.ts".into(), types);
        files.insert("README.md".into(), templates::readme(ctx, Some(options)));
        if options.include_example {
            files.insert("example/index.html".into(), templates::example_html(ctx));
            files.insert("example/main.js".into(), templates::example_js().to_string());
        }
        if options.include_tests {
            files.insert("test/theme.test.js".into(), templates::package_tests(ctx));
        }

        let bytes = build_archive(files, self.archive_timeout).await?;
        let version = options.version().to_string();
        Ok(Artifact {
            filename: format!("{}-v{}.zip", options.name, version),
            bytes,
            package: Some((options.name.clone(), version)),
        })
    }
}

/// `category -> subcategory -> path -> {id, value, type, description, validation}`.
fn shareable_tokens(tokens: &[DesignToken]) -> Value {
    let mut categories = Map::new();
    for token in tokens {
        let mut entry = Map::new();
        entry.insert("id".into(), json!(token.id));
        entry.insert("value".into(), token.value.to_json());
        entry.insert("type".into(), json!(token.token_type));
        entry.insert("description".into(), json!(token.description));
        if let Some(validation) = &token.validation {
            entry.insert("validation".into(), json!(validation));
        }

        let subcategories = categories
            .entry(token.category.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(subcategories) = subcategories {
            let paths = subcategories
                .entry(token.subcategory.clone().unwrap_or_else(|| "general".to_string()))
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(paths) = paths {
                paths.insert(token.path.clone(), Value::Object(entry));
            }
        }
    }
    Value::Object(categories)
}

fn export_shareable(ctx: &ExportContext<'_>, options: &ShareableOptions) -> Result<Artifact, ThemingError> {
    let mut document = Map::new();
    document.insert("name".into(), json!(ctx.preset.name));
    document.insert("description".into(), json!(ctx.preset.description));
    document.insert("version".into(), json!(EXPORT_SCHEMA_VERSION));
    document.insert("tokens".into(), shareable_tokens(ctx.tokens));
    if !ctx.preset.tags.is_empty() {
        document.insert("tags".into(), json!(ctx.preset.tags));
    }

    if options.include_metadata {
        document.insert("metadata".into(), serde_json::to_value(ctx.metadata)?);
        let mut preset = serde_json::to_value(ctx.preset)?;
        if let Value::Object(fields) = &mut preset {
            fields.remove("id");
            if let Some(Value::Object(metadata)) = fields.get_mut("metadata") {
                metadata.remove("isDefault");
                metadata.remove("isBuiltIn");
            }
        }
        document.insert("preset".into(), preset);
    }

    let document = Value::Object(document);
    let text = if options.compressed {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    Ok(Artifact {
        filename: format!("{}-theme.json", ctx.preset.name),
        bytes: text.into_bytes(),
        package: None,
    })
}
