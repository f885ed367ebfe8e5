//! Import inputs and their classification.
//!
//! An [`ImportSource`] is classified exactly once into a [`ClassifiedImport`]; the
//! importer then dispatches on that variant. Classification of JSON documents and
//! unpacked archives is pure.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use triton_core::error::CoreError;

use crate::theming::errors::ThemingError;
use crate::theming::export::archive::ArchiveFiles;
use crate::theming::export::ExportFormat;

/// Something to import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSource {
    /// File contents with the original file name; the extension picks the parser.
    File { name: String, bytes: Vec<u8> },
    /// A JSON document as text.
    Json(String),
    /// An already parsed JSON document.
    Object(Value),
}

impl ImportSource {
    pub fn file(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        ImportSource::File {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ThemingError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ThemingError::storage(
                "read import file",
                CoreError::Filesystem {
                    message: "Failed to read import file".to_string(),
                    path: path.to_path_buf(),
                    source: e,
                },
            )
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(ImportSource::File { name, bytes })
    }
}

/// A source whose format has been determined.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedImport {
    Shareable(Value),
    Package(ArchiveFiles),
    Primevue(ArchiveFiles),
}

impl ClassifiedImport {
    pub fn format(&self) -> ExportFormat {
        match self {
            ClassifiedImport::Shareable(_) => ExportFormat::Shareable,
            ClassifiedImport::Package(_) => ExportFormat::Package,
            ClassifiedImport::Primevue(_) => ExportFormat::Primevue,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    pub token_count: usize,
    pub component_count: usize,
}

impl ImportValidation {
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }
}

/// Validation report plus the classified source when it is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub report: ImportValidation,
    pub import: Option<ClassifiedImport>,
}

impl Classification {
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            report: ImportValidation::rejected(message),
            import: None,
        }
    }

    fn finish(mut report: ImportValidation, import: ClassifiedImport) -> Self {
        report.valid = report.errors.is_empty();
        report.format = Some(import.format());
        let import = report.valid.then_some(import);
        Self { report, import }
    }
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// Leaf entries in `tokens.category.subcategory.path`.
fn count_shareable_tokens(tokens: &Value) -> usize {
    tokens
        .as_object()
        .into_iter()
        .flat_map(|categories| categories.values())
        .filter_map(Value::as_object)
        .flat_map(|subcategories| subcategories.values())
        .filter_map(Value::as_object)
        .map(|paths| paths.len())
        .sum()
}

/// Classifies a parsed JSON document. Only the shareable format is a JSON format.
pub fn classify_document(data: Value) -> Classification {
    let has_name = non_empty_str(&data, "name").is_some();
    let tokens = data.get("tokens").filter(|t| t.is_object());

    match (has_name, tokens) {
        (true, Some(tokens)) => {
            let report = ImportValidation {
                token_count: count_shareable_tokens(tokens),
                component_count: tokens
                    .get("component")
                    .and_then(Value::as_object)
                    .map_or(0, |components| components.len()),
                ..Default::default()
            };
            Classification::finish(report, ClassifiedImport::Shareable(data))
        }
        (false, Some(_)) => Classification::rejected("Theme name is required"),
        (true, None) => Classification::rejected("Theme tokens are required"),
        (false, None) => Classification::rejected("Unknown theme format"),
    }
}

/// `theme.js` of a package archive, preferring the source copy.
pub(crate) fn package_theme_file(files: &ArchiveFiles) -> Option<&String> {
    ["src/theme.js", "theme.js", "dist/theme.js"]
        .into_iter()
        .find_map(|path| files.get(path))
}

fn count_component_modules(files: &ArchiveFiles, dir: &str) -> usize {
    files
        .keys()
        .filter(|path| path.strip_prefix(dir).is_some_and(|rest| rest.ends_with(".js") && !rest.contains('/')))
        .count()
}

/// Classifies unpacked archive contents: `package.json` means a package,
/// otherwise `theme.js` means a PrimeVue theme.
pub fn classify_archive(files: ArchiveFiles) -> Classification {
    let mut report = ImportValidation::default();

    if let Some(package_json) = files.get("package.json") {
        match serde_json::from_str::<Value>(package_json) {
            Ok(package) => {
                if non_empty_str(&package, "name").is_none() {
                    report.errors.push("Package missing name".to_string());
                }
                if package.get("main").is_none() && package.get("module").is_none() {
                    report.warnings.push("Package missing main entry point".to_string());
                }
            }
            Err(_) => report.errors.push("Invalid package.json".to_string()),
        }
        if package_theme_file(&files).is_none() {
            report
                .warnings
                .push("Package contains no theme.js; no tokens will be imported".to_string());
        }
        report.component_count = count_component_modules(&files, "src/components/");
        return Classification::finish(report, ClassifiedImport::Package(files));
    }

    if let Some(theme) = files.get("theme.js") {
        if !theme.contains("export default") && !theme.contains("module.exports") {
            report.warnings.push("Theme file may not export properly".to_string());
        }
        report.component_count = count_component_modules(&files, "components/");
        return Classification::finish(report, ClassifiedImport::Primevue(files));
    }

    Classification::rejected("Unknown ZIP format. Expected package or PrimeVue theme structure.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn shareable_document_is_classified_with_counts() {
        let classification = classify_document(json!({
            "name": "Harbor",
            "tokens": {
                "primitive": { "borderRadius": { "borderRadius.md": { "value": "6px" } } },
                "component": {
                    "button": { "background": { "value": "#fff" }, "color": { "value": "#000" } },
                    "card": { "background": { "value": "#eee" } }
                }
            }
        }));
        assert!(classification.report.valid);
        assert_eq!(classification.report.format, Some(ExportFormat::Shareable));
        assert_eq!(classification.report.token_count, 4);
        assert_eq!(classification.report.component_count, 2);
        assert!(matches!(classification.import, Some(ClassifiedImport::Shareable(_))));
    }

    #[test]
    fn document_errors_name_the_missing_field() {
        let cases = [
            (json!({ "tokens": {} }), "Theme name is required"),
            (json!({ "name": "", "tokens": {} }), "Theme name is required"),
            (json!({ "name": "Harbor" }), "Theme tokens are required"),
            (json!({ "name": "Harbor", "tokens": "nope" }), "Theme tokens are required"),
            (json!({ "colors": {} }), "Unknown theme format"),
            (json!([1, 2, 3]), "Unknown theme format"),
        ];
        for (document, message) in cases {
            let classification = classify_document(document);
            assert!(!classification.report.valid);
            assert!(classification.import.is_none());
            assert_eq!(classification.report.errors, vec![message.to_string()]);
        }
    }

    #[test]
    fn package_json_wins_over_theme_js() {
        let mut files = ArchiveFiles::new();
        files.insert("package.json".into(), r#"{"name":"harbor-theme"}"#.into());
        files.insert("theme.js".into(), "export default {}".into());

        let classification = classify_archive(files);
        assert!(classification.report.valid);
        assert_eq!(classification.report.format, Some(ExportFormat::Package));
        assert_eq!(classification.report.warnings, vec!["Package missing main entry point".to_string()]);
    }

    #[test]
    fn package_without_name_is_rejected() {
        let mut files = ArchiveFiles::new();
        files.insert("package.json".into(), r#"{"main":"index.js"}"#.into());
        files.insert("src/theme.js".into(), "export default {}".into());

        let classification = classify_archive(files);
        assert!(!classification.report.valid);
        assert_eq!(classification.report.errors, vec!["Package missing name".to_string()]);
        assert!(classification.import.is_none());
    }

    #[test]
    fn primevue_archive_warns_about_missing_export() {
        let mut files = ArchiveFiles::new();
        files.insert("theme.js".into(), "const theme = {}".into());
        files.insert("components/button.js".into(), "export default {}".into());

        let classification = classify_archive(files);
        assert_eq!(classification.report.format, Some(ExportFormat::Primevue));
        assert_eq!(classification.report.component_count, 1);
        assert_eq!(classification.report.warnings, vec!["Theme file may not export properly".to_string()]);
    }

    #[test]
    fn unknown_archive_is_rejected() {
        let mut files = ArchiveFiles::new();
        files.insert("readme.txt".into(), "hello".into());
        let classification = classify_archive(files);
        assert_eq!(
            classification.report.errors,
            vec!["Unknown ZIP format. Expected package or PrimeVue theme structure.".to_string()]
        );
    }
}
