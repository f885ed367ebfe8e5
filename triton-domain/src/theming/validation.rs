//! Structural validation of presets, color strings and import files.
//!
//! Validators take untyped JSON so they can report every problem of a malformed
//! file instead of stopping at the first deserialization error. Problems are returned
//! as data in a [`ValidationReport`]; nothing here fails.

use chrono::DateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use triton_core::types::Color;

use super::migration::is_editable_color;
use super::types::BaseTheme;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#([A-Fa-f0-9]{3}|[A-Fa-f0-9]{6}|[A-Fa-f0-9]{8})$").unwrap();
    static ref RGB_COLOR: Regex =
        Regex::new(r"^rgba?\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*(,\s*(0|1|0?\.\d+))?\s*\)$").unwrap();
    static ref HSL_COLOR: Regex =
        Regex::new(r"^hsla?\(\s*\d+\s*,\s*\d+%\s*,\s*\d+%\s*(,\s*(0|1|0?\.\d+))?\s*\)$").unwrap();
    static ref NAMED_COLOR: Regex = Regex::new(r"^[a-zA-Z]+$").unwrap();
    static ref SEMVER_PREFIX: Regex = Regex::new(r"^\d+\.\d+\.\d+").unwrap();
}

/// Size limit for single-preset JSON files.
pub const PRESET_FILE_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Minimum WCAG AA contrast for body text.
pub const WCAG_AA_CONTRAST: f32 = 4.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    fn absorb(&mut self, other: ValidationReport, prefix: Option<&str>) {
        let prefixed = |m: String| match prefix {
            Some(p) => format!("{}: {}", p, m),
            None => m,
        };
        self.errors.extend(other.errors.into_iter().map(prefixed));
        self.warnings.extend(other.warnings.into_iter().map(prefixed));
    }
}

fn non_empty_str<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn base_theme_list() -> String {
    BaseTheme::ALL.iter().map(BaseTheme::as_str).collect::<Vec<_>>().join(", ")
}

pub fn validate_preset(preset: &Value) -> ValidationReport {
    let Some(p) = preset.as_object() else {
        return ValidationReport::error("Preset must be an object");
    };
    let mut report = ValidationReport::default();

    if non_empty_str(p, "id").is_none() {
        report.errors.push("Preset must have a valid ID".to_string());
    }
    let name = non_empty_str(p, "name");
    if name.is_none() {
        report.errors.push("Preset must have a valid name".to_string());
    }

    let base_ok = p
        .get("baseTheme")
        .and_then(Value::as_str)
        .is_some_and(|b| b.parse::<BaseTheme>().is_ok());
    if !base_ok {
        report.errors.push(format!("Base theme must be one of: {}", base_theme_list()));
    }

    match p.get("colorOverrides").and_then(Value::as_array) {
        None => report.errors.push("Color overrides must be an array".to_string()),
        Some(overrides) => {
            for (index, color_override) in overrides.iter().enumerate() {
                let result = validate_color_override(color_override);
                if !result.is_valid() {
                    report.absorb(result, Some(&format!("Color override {}", index)));
                }
            }
            if overrides.is_empty() {
                report.warnings.push("Preset has no color overrides".to_string());
            }
        }
    }

    match p.get("metadata") {
        Some(metadata @ Value::Object(_)) => report.absorb(validate_metadata(metadata), None),
        _ => report.errors.push("Preset must have metadata".to_string()),
    }

    if name.is_some_and(|n| n.chars().count() > 50) {
        report.warnings.push("Preset name is very long (>50 characters)".to_string());
    }
    report
}

pub fn validate_color_override(color_override: &Value) -> ValidationReport {
    let Some(o) = color_override.as_object() else {
        return ValidationReport::error("Color override must be an object");
    };
    let mut report = ValidationReport::default();

    match non_empty_str(o, "tokenId") {
        None => report.errors.push("Token ID is required".to_string()),
        Some(id) if !is_editable_color(id) => report.warnings.push(format!("Unknown token ID: {}", id)),
        Some(_) => {}
    }

    match non_empty_str(o, "value") {
        None => report.errors.push("Color value is required".to_string()),
        Some(value) => report.absorb(validate_color(value), None),
    }

    if o.get("palette").is_some_and(|p| !p.is_object() && !p.is_null()) {
        report.warnings.push("Palette should be an object".to_string());
    }
    report
}

/// Checks hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` and bare color names.
pub fn validate_color(color: &str) -> ValidationReport {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        return ValidationReport::error("Color must be a string");
    }
    let mut report = ValidationReport::default();

    if trimmed.starts_with('#') {
        if !HEX_COLOR.is_match(trimmed) {
            report.errors.push("Invalid hex color format".to_string());
        }
    } else if trimmed.starts_with("rgb") {
        if !RGB_COLOR.is_match(trimmed) {
            report.errors.push("Invalid RGB/RGBA color format".to_string());
        }
    } else if trimmed.starts_with("hsl") {
        if !HSL_COLOR.is_match(trimmed) {
            report.errors.push("Invalid HSL/HSLA color format".to_string());
        }
    } else if !NAMED_COLOR.is_match(trimmed) {
        report
            .warnings
            .push("Unrecognized color format - prefer hex colors for consistency".to_string());
    }

    if trimmed.len() > 30 {
        report.warnings.push("Color value is unusually long".to_string());
    }
    report
}

/// RFC 3339 timestamps are accepted with or without fractional seconds.
fn is_valid_date(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw).is_ok()
}

pub fn validate_metadata(metadata: &Value) -> ValidationReport {
    let Some(m) = metadata.as_object() else {
        return ValidationReport::error("Metadata must be an object");
    };
    let mut report = ValidationReport::default();

    for (key, label) in [("created", "Created"), ("modified", "Modified")] {
        match non_empty_str(m, key) {
            None => report.errors.push(format!("{} date is required", label)),
            Some(raw) if !is_valid_date(raw) => {
                report.errors.push(format!("{} date must be a valid ISO string", label))
            }
            Some(_) => {}
        }
    }

    match non_empty_str(m, "version") {
        None => report.warnings.push("Version is recommended".to_string()),
        Some(v) if !SEMVER_PREFIX.is_match(v) => report
            .warnings
            .push("Version should follow semantic versioning (e.g., 1.0.0)".to_string()),
        Some(_) => {}
    }

    if m.get("author").is_some_and(|a| !a.is_string() && !a.is_null()) {
        report.warnings.push("Author should be a string".to_string());
    }
    if m.get("tags").is_some_and(|t| !t.is_array() && !t.is_null()) {
        report.warnings.push("Tags should be an array".to_string());
    }
    for key in ["isBuiltIn", "isDefault"] {
        if m.get(key).is_some_and(|v| !v.is_boolean() && !v.is_null()) {
            report.warnings.push(format!("{} should be a boolean", key));
        }
    }
    report
}

/// Checks name, size and emptiness of a preset file before it is read.
pub fn validate_import_file(file_name: &str, size: u64) -> ValidationReport {
    let mut report = ValidationReport::default();
    if !file_name.to_ascii_lowercase().ends_with(".json") {
        report.errors.push("File must be a JSON file".to_string());
    }
    if size > PRESET_FILE_MAX_BYTES {
        report.errors.push(format!(
            "File too large ({:.2}MB > 10MB)",
            size as f64 / 1024.0 / 1024.0
        ));
    }
    if size == 0 {
        report.errors.push("File is empty".to_string());
    }
    report
}

/// WCAG contrast ratio of two color strings, or `None` if either does not parse.
pub fn contrast_ratio(foreground: &str, background: &str) -> Option<f32> {
    let fg: Color = foreground.trim().parse().ok()?;
    let bg: Color = background.trim().parse().ok()?;
    Some(fg.contrast_ratio(&bg))
}

pub fn check_contrast(foreground: &str, background: &str) -> ValidationReport {
    if !validate_color(foreground).is_valid() || !validate_color(background).is_valid() {
        return ValidationReport::error("Cannot check contrast for invalid colors");
    }
    let mut report = ValidationReport::default();
    if foreground.trim().eq_ignore_ascii_case(background.trim()) {
        report.warnings.push("Foreground and background colors are the same".to_string());
    }
    match contrast_ratio(foreground, background) {
        Some(ratio) if ratio < WCAG_AA_CONTRAST => report.warnings.push(format!(
            "Contrast ratio {:.2}:1 is below the WCAG AA minimum of 4.5:1",
            ratio
        )),
        Some(_) => {}
        None => report.warnings.push("Failed to check color contrast".to_string()),
    }
    report
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub is_all_valid: bool,
    pub summary: String,
}

pub fn validation_summary(results: &[ValidationReport]) -> ValidationSummary {
    let total_errors: usize = results.iter().map(|r| r.errors.len()).sum();
    let total_warnings: usize = results.iter().map(|r| r.warnings.len()).sum();
    let plural = |n: usize, word: &str| format!("{} {}{}", n, word, if n > 1 { "s" } else { "" });

    let summary = if total_errors == 0 && total_warnings == 0 {
        "All validations passed".to_string()
    } else {
        let mut parts = Vec::new();
        if total_errors > 0 {
            parts.push(plural(total_errors, "error"));
        }
        if total_warnings > 0 {
            parts.push(plural(total_warnings, "warning"));
        }
        parts.join(", ")
    };

    ValidationSummary {
        total_errors,
        total_warnings,
        is_all_valid: results.iter().all(ValidationReport::is_valid),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn valid_preset() -> Value {
        json!({
            "id": "user-1",
            "name": "Navy",
            "baseTheme": "Aura",
            "colorOverrides": [{ "tokenId": "primary", "value": "#0B2244" }],
            "metadata": {
                "created": "2024-01-01T00:00:00Z",
                "modified": "2024-01-01T00:00:00.000Z",
                "version": "1.0.0"
            }
        })
    }

    #[rstest]
    #[case("#fff", true)]
    #[case("#0B2244", true)]
    #[case("#0B2244FF", true)]
    #[case("#12345", false)]
    #[case("rgb(0, 0, 0)", true)]
    #[case("rgba(0, 0, 0, 0.4)", true)]
    #[case("rgb(0, 0)", false)]
    #[case("hsl(210, 50%, 40%)", true)]
    #[case("hsl(210, 50, 40)", false)]
    #[case("navy", true)]
    fn validates_color_formats(#[case] color: &str, #[case] valid: bool) {
        assert_eq!(validate_color(color).is_valid(), valid, "{}", color);
    }

    #[test]
    fn odd_color_is_a_warning_not_an_error() {
        let report = validate_color("var(--brand)");
        assert!(report.is_valid());
        assert_eq!(report.warnings, vec!["Unrecognized color format - prefer hex colors for consistency".to_string()]);
    }

    #[test]
    fn valid_preset_passes() {
        let report = validate_preset(&valid_preset());
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn preset_errors_are_collected_and_prefixed() {
        let mut preset = valid_preset();
        preset["baseTheme"] = json!("Bootstrap");
        preset["colorOverrides"] = json!([{ "tokenId": "mystery", "value": "#zzz" }]);
        preset["metadata"]["created"] = json!("yesterday");

        let report = validate_preset(&preset);
        assert_eq!(
            report.errors,
            vec![
                "Base theme must be one of: Material, Aura, Lara, Nora".to_string(),
                "Color override 0: Invalid hex color format".to_string(),
                "Created date must be a valid ISO string".to_string(),
            ]
        );
        assert_eq!(report.warnings, vec!["Color override 0: Unknown token ID: mystery".to_string()]);
    }

    #[test]
    fn non_object_preset_is_rejected() {
        assert_eq!(validate_preset(&json!("preset")).errors, vec!["Preset must be an object".to_string()]);
    }

    #[test]
    fn metadata_warns_on_non_semver() {
        let report = validate_metadata(&json!({
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z",
            "version": "v1",
            "tags": "a,b"
        }));
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "Version should follow semantic versioning (e.g., 1.0.0)".to_string(),
                "Tags should be an array".to_string(),
            ]
        );
    }

    #[test]
    fn import_file_checks() {
        assert!(validate_import_file("theme.json", 100).is_valid());
        let report = validate_import_file("theme.zip", 0);
        assert_eq!(report.errors, vec!["File must be a JSON file".to_string(), "File is empty".to_string()]);
        let big = validate_import_file("big.json", 11 * 1024 * 1024);
        assert_eq!(big.errors, vec!["File too large (11.00MB > 10MB)".to_string()]);
    }

    #[test]
    fn contrast_checks() {
        let ratio = contrast_ratio("#000000", "#ffffff").unwrap();
        assert!((ratio - 21.0).abs() < 0.01);
        assert!(check_contrast("#000000", "#ffffff").warnings.is_empty());
        assert_eq!(check_contrast("#777777", "#888888").warnings.len(), 1);
        assert!(!check_contrast("#zzz", "#fff").is_valid());
    }

    #[test]
    fn summary_pluralizes() {
        let reports = vec![
            ValidationReport { errors: vec!["a".into()], warnings: vec!["b".into(), "c".into()] },
            ValidationReport::default(),
        ];
        let summary = validation_summary(&reports);
        assert_eq!(summary.summary, "1 error, 2 warnings");
        assert!(!summary.is_all_valid);
        assert_eq!(validation_summary(&[]).summary, "All validations passed");
    }
}
