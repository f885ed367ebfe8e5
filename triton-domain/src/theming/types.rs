//! Core data structures of the design-token engine.
//!
//! This module defines token identifiers and values, the [`DesignToken`] record
//! with its validation rule, the closed vocabularies ([`TokenCategory`],
//! [`TokenType`], [`BaseTheme`]) and the derived [`TokenRelationship`] view.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::errors::TokenValidationError;
use super::inference::humanize_token_name;

// --- TokenId ---
/// A unique identifier for a design token.
///
/// Identifiers are hierarchical and dot separated (e.g. `button.hover.background`,
/// `semantic.primary.500`). An id is never reused for a different meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last dot-separated segment.
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for TokenId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Vocabularies ---
/// Mutually exclusive classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Primitive,
    Semantic,
    Component,
    Custom,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 4] = [
        TokenCategory::Primitive,
        TokenCategory::Semantic,
        TokenCategory::Component,
        TokenCategory::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenCategory::Primitive => "primitive",
            TokenCategory::Semantic => "semantic",
            TokenCategory::Component => "component",
            TokenCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown token category: {}", s))
    }
}

/// What kind of styling value a token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Size,
    Spacing,
    BorderRadius,
    Shadow,
    Typography,
}

impl TokenType {
    pub const ALL: [TokenType; 6] = [
        TokenType::Color,
        TokenType::Size,
        TokenType::Spacing,
        TokenType::BorderRadius,
        TokenType::Shadow,
        TokenType::Typography,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Size => "size",
            TokenType::Spacing => "spacing",
            TokenType::BorderRadius => "borderRadius",
            TokenType::Shadow => "shadow",
            TokenType::Typography => "typography",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown token type: {}", s))
    }
}

/// The foundational style systems a preset can be layered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseTheme {
    Material,
    Aura,
    Lara,
    Nora,
}

impl BaseTheme {
    pub const ALL: [BaseTheme; 4] = [BaseTheme::Material, BaseTheme::Aura, BaseTheme::Lara, BaseTheme::Nora];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseTheme::Material => "Material",
            BaseTheme::Aura => "Aura",
            BaseTheme::Lara => "Lara",
            BaseTheme::Nora => "Nora",
        }
    }
}

impl Default for BaseTheme {
    fn default() -> Self {
        BaseTheme::Aura
    }
}

impl fmt::Display for BaseTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseTheme::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown base theme: {}", s))
    }
}

// --- TokenValue ---
lazy_static! {
    static ref REFERENCE_PATTERN: Regex = Regex::new(r"\{([^{}\s]+)\}").unwrap();
}

/// The value of a design token: a literal number or a string.
///
/// Strings cover hex colors, sizes with units and reference placeholders such as
/// `{primary.500}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Number(f64),
    Text(String),
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            TokenValue::Number(_) => None,
        }
    }

    /// Numeric view used by min/max rules. Text is parsed when it is a plain number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TokenValue::Number(n) => Some(*n),
            TokenValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Ids named by `{...}` placeholders, in order of appearance.
    pub fn references(&self) -> Vec<String> {
        match self {
            TokenValue::Text(s) => REFERENCE_PATTERN
                .captures_iter(s)
                .map(|c| c[1].to_string())
                .collect(),
            TokenValue::Number(_) => Vec::new(),
        }
    }

    /// `true` when the whole value is a single `{...}` placeholder.
    pub fn is_reference(&self) -> bool {
        match self {
            TokenValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.starts_with('{')
                    && trimmed.ends_with('}')
                    && REFERENCE_PATTERN.find(trimmed).map(|m| m.len()) == Some(trimmed.len())
            }
            TokenValue::Number(_) => false,
        }
    }

    /// Converts a JSON leaf. Objects, arrays and null have no token value.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(TokenValue::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(TokenValue::Number),
            serde_json::Value::Bool(b) => Some(TokenValue::Text(b.to_string())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TokenValue::Text(s) => serde_json::Value::String(s.clone()),
            TokenValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Text(s) => f.write_str(s),
            TokenValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        TokenValue::Text(s.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(s: String) -> Self {
        TokenValue::Text(s)
    }
}

impl From<f64> for TokenValue {
    fn from(n: f64) -> Self {
        TokenValue::Number(n)
    }
}

impl From<i32> for TokenValue {
    fn from(n: i32) -> Self {
        TokenValue::Number(f64::from(n))
    }
}

// --- Validation ---
/// A caller-supplied predicate. Not serialized.
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Fn(&TokenValue) -> Result<(), String> + Send + Sync>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&TokenValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &TokenValue) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

impl PartialEq for CustomValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Constraint attached to a token. Rules run in field order; the first failure wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the string form of the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<TokenValue>>,
    #[serde(skip)]
    pub validator: Option<CustomValidator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl TokenValidation {
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Default::default()
        }
    }

    /// Applies min, max, pattern, allowed values and the custom predicate, in that order.
    pub fn check(&self, value: &TokenValue) -> Result<(), TokenValidationError> {
        let numeric = value.as_f64();
        if let (Some(min), Some(v)) = (self.min, numeric) {
            if v < min {
                return Err(TokenValidationError::BelowMinimum { min });
            }
        }
        if let (Some(max), Some(v)) = (self.max, numeric) {
            if v > max {
                return Err(TokenValidationError::AboveMaximum { max });
            }
        }
        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern).map_err(|_| TokenValidationError::InvalidPattern {
                pattern: pattern.clone(),
            })?;
            if !regex.is_match(&value.to_string()) {
                return Err(TokenValidationError::PatternMismatch);
            }
        }
        if let Some(allowed) = &self.allowed_values {
            if !allowed.contains(value) {
                return Err(TokenValidationError::NotAllowed {
                    allowed: allowed.iter().map(ToString::to_string).collect(),
                });
            }
        }
        if let Some(validator) = &self.validator {
            validator.call(value).map_err(TokenValidationError::Custom)?;
        }
        Ok(())
    }
}

/// Bookkeeping carried along with a token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub experimental: bool,
}

// --- DesignToken ---
/// A single named, typed styling value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignToken {
    pub id: TokenId,
    pub label: String,
    pub category: TokenCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Dot-delimited path inside the source theme object.
    pub path: String,
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub default_value: TokenValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Components that consume this token. Informational.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub affects: BTreeSet<String>,
    /// Tokens this token's value refers to.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub dependencies: BTreeSet<TokenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<TokenValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

impl DesignToken {
    /// Creates a token whose label is the humanized last segment of `id` and whose
    /// default value equals `value`.
    pub fn new(
        id: impl Into<TokenId>,
        category: TokenCategory,
        path: impl Into<String>,
        value: impl Into<TokenValue>,
        token_type: TokenType,
    ) -> Self {
        let id = id.into();
        let value = value.into();
        Self {
            label: humanize_token_name(id.last_segment()),
            id,
            category,
            subcategory: None,
            path: path.into(),
            default_value: value.clone(),
            value,
            token_type,
            description: None,
            affects: BTreeSet::new(),
            dependencies: BTreeSet::new(),
            validation: None,
            metadata: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_affects<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affects = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TokenId>,
    {
        self.dependencies = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validation(mut self, validation: TokenValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Component name for component tokens.
    pub fn component(&self) -> Option<&str> {
        match self.category {
            TokenCategory::Component => self.subcategory.as_deref(),
            _ => None,
        }
    }

    pub fn matches_query(&self, needle_lower: &str) -> bool {
        self.id.as_str().to_lowercase().contains(needle_lower)
            || self.label.to_lowercase().contains(needle_lower)
            || self.path.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

/// Derived view of a token's place in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRelationship {
    pub parent: TokenId,
    /// Tokens that declare `parent` as a dependency.
    pub children: Vec<TokenId>,
    pub affects: BTreeSet<String>,
}

/// Tokens grouped by discovery group (`primitive`, `semantic`, or a component name).
pub type TokenGroups = BTreeMap<String, Vec<DesignToken>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_value_serde_is_untagged() {
        let text: TokenValue = serde_json::from_str("\"#007bff\"").unwrap();
        assert_eq!(text, TokenValue::from("#007bff"));
        let number: TokenValue = serde_json::from_str("4").unwrap();
        assert_eq!(number, TokenValue::Number(4.0));
        assert_eq!(serde_json::to_string(&TokenValue::from("1rem")).unwrap(), "\"1rem\"");
    }

    #[test]
    fn token_value_references() {
        let value = TokenValue::from("{button.background}");
        assert!(value.is_reference());
        assert_eq!(value.references(), vec!["button.background".to_string()]);

        let mixed = TokenValue::from("0 0 0 1px {focus.ring.color}");
        assert!(!mixed.is_reference());
        assert_eq!(mixed.references(), vec!["focus.ring.color".to_string()]);
        assert!(TokenValue::from("#fff").references().is_empty());
    }

    #[test]
    fn token_type_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&TokenType::BorderRadius).unwrap(), "\"borderRadius\"");
        assert_eq!("borderRadius".parse::<TokenType>().unwrap(), TokenType::BorderRadius);
        assert_eq!(serde_json::to_string(&TokenCategory::Semantic).unwrap(), "\"semantic\"");
    }

    #[test]
    fn design_token_new_derives_label_and_default() {
        let token = DesignToken::new(
            "button.hover.background",
            TokenCategory::Component,
            "hover.background",
            "{button.background}",
            TokenType::Color,
        );
        assert_eq!(token.label, "Background");
        assert_eq!(token.default_value, token.value);
    }

    #[test]
    fn design_token_json_uses_camel_case_fields() {
        let token = DesignToken::new("primitive.borderRadius.md", TokenCategory::Primitive, "borderRadius.md", "6px", TokenType::BorderRadius)
            .with_subcategory("borderRadius");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "borderRadius");
        assert_eq!(json["defaultValue"], "6px");
        assert!(json.get("affects").is_none());

        let back: DesignToken = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn custom_validator_equality_is_identity() {
        let v = CustomValidator::new(|_| Ok(()));
        assert_eq!(v.clone(), v);
        assert_ne!(CustomValidator::new(|_| Ok(())), v);
    }
}
