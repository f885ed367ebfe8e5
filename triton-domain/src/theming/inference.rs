//! Naming and classification heuristics shared by discovery and import.

use lazy_static::lazy_static;
use regex::Regex;

use super::types::{TokenType, TokenValue};

lazy_static! {
    static ref HEX_VALUE: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
    static ref UNIT_VALUE: Regex = Regex::new(r"^-?\d+(?:\.\d+)?(?:px|rem|em|%|vh|vw)$").unwrap();
}

const RADIUS_KEYWORDS: &[&str] = &["radius", "rounded", "corner"];
const SHADOW_KEYWORDS: &[&str] = &["shadow", "elevation"];
const COLOR_KEYWORDS: &[&str] = &["color", "background", "border", "outline", "fill", "stroke"];
const SPACING_KEYWORDS: &[&str] = &["padding", "margin", "gap", "spacing", "space", "offset", "indent"];
const SIZE_KEYWORDS: &[&str] = &["size", "width", "height", "dimension"];
const TYPOGRAPHY_KEYWORDS: &[&str] = &["font", "text", "line", "letter", "weight"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn looks_like_color(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    HEX_VALUE.is_match(&v)
        || v.starts_with("rgb(")
        || v.starts_with("rgba(")
        || v.starts_with("hsl(")
        || v.starts_with("hsla(")
        || v.contains("var(--")
}

/// Classifies a token from its key (or full dotted path) and its value.
///
/// Precedence:
/// 1. key keywords for radius, shadow and color;
/// 2. a color literal or `{...}` reference value;
/// 3. key keywords for spacing, typography and size, in that order, so
///    `lineHeight` and `fontSize` are typography;
/// 4. a number with a unit is a size, a `box-shadow` fragment a shadow.
///
/// Anything else is typography.
pub fn infer_token_type(name: &str, value: &TokenValue) -> TokenType {
    let key = name.to_ascii_lowercase();

    if contains_any(&key, RADIUS_KEYWORDS) {
        return TokenType::BorderRadius;
    }
    if contains_any(&key, SHADOW_KEYWORDS) {
        return TokenType::Shadow;
    }
    if contains_any(&key, COLOR_KEYWORDS) {
        return TokenType::Color;
    }

    let text = value.to_string();
    if looks_like_color(&text) || !value.references().is_empty() {
        return TokenType::Color;
    }
    if contains_any(&key, SPACING_KEYWORDS) {
        return TokenType::Spacing;
    }
    if contains_any(&key, TYPOGRAPHY_KEYWORDS) {
        return TokenType::Typography;
    }
    if contains_any(&key, SIZE_KEYWORDS) {
        return TokenType::Size;
    }
    if UNIT_VALUE.is_match(text.trim()) {
        return TokenType::Size;
    }
    if text.contains("box-shadow") || text.contains("drop-shadow") {
        return TokenType::Shadow;
    }
    TokenType::Typography
}

/// `stripedBackground` → `Striped Background`, `surface_50` → `Surface 50`.
///
/// camelCase humps, `_`, `-`, `.` and the start of a digit run are word boundaries.
pub fn humanize_token_name(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => {
                (c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()))
                    || (c.is_ascii_digit() && !p.is_ascii_digit())
            }
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Describes a token from its path, e.g. `Hover state background for button`.
pub fn generate_description(path: &str, component: Option<&str>) -> String {
    let target = component.unwrap_or("the design system");
    let last = path.rsplit('.').next().unwrap_or(path);
    let lower = path.to_ascii_lowercase();

    for state in ["hover", "focus", "active", "disabled"] {
        if lower.split('.').any(|segment| segment.contains(state)) {
            let state_label = humanize_token_name(state);
            return format!(
                "{} state {} for {}",
                state_label,
                humanize_token_name(last).to_lowercase(),
                target
            );
        }
    }

    match last.to_ascii_lowercase().as_str() {
        "background" => format!("Background color of {}", target),
        "color" => format!("Text color of {}", target),
        l if l.starts_with("border") => format!("Border styling of {}", target),
        l if l.starts_with("padding") => format!("Inner spacing of {}", target),
        l if l.starts_with("margin") => format!("Outer spacing of {}", target),
        _ => format!("{} for {}", humanize_token_name(last), target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("stripedBackground", "Striped Background")]
    #[case("hover_background-color", "Hover Background Color")]
    #[case("surface50", "Surface 50")]
    #[case("borderRadius.md", "Border Radius Md")]
    #[case("xs", "Xs")]
    fn humanizes_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(humanize_token_name(input), expected);
    }

    #[rstest]
    #[case("hover.background", "#fff", TokenType::Color)]
    #[case("padding.x", "1rem", TokenType::Spacing)]
    #[case("borderRadius.xs", "2px", TokenType::BorderRadius)]
    #[case("focusRing.shadow", "0 0 0 1px red", TokenType::Shadow)]
    #[case("primary.500", "{navy.500}", TokenType::Color)]
    #[case("fontWeight", "500", TokenType::Typography)]
    #[case("icon.width", "2rem", TokenType::Size)]
    #[case("x", "8px", TokenType::Size)]
    #[case("transitionDuration", "0.2s", TokenType::Typography)]
    #[case("overlay", "rgba(0, 0, 0, 0.4)", TokenType::Color)]
    #[case("borderRadius", "6px", TokenType::BorderRadius)]
    #[case("boxShadow", "0 1px 2px rgba(0, 0, 0, 0.1)", TokenType::Shadow)]
    #[case("lineHeight", "1.5", TokenType::Typography)]
    #[case("fontSize", "1rem", TokenType::Typography)]
    #[case("borderWidth", "1px", TokenType::Color)]
    fn infers_types(#[case] key: &str, #[case] value: &str, #[case] expected: TokenType) {
        assert_eq!(infer_token_type(key, &TokenValue::from(value)), expected);
    }

    #[test]
    fn descriptions_follow_state_then_property() {
        assert_eq!(
            generate_description("hover.background", Some("button")),
            "Hover state background for button"
        );
        assert_eq!(generate_description("row.background", Some("datatable")), "Background color of datatable");
        assert_eq!(generate_description("padding.x", Some("button")), "X for button");
        assert_eq!(generate_description("borderRadius.md", None), "Md for the design system");
    }
}
