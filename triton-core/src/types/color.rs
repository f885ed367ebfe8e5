//! Color representation and the small amount of color math the token engine needs.
//!
//! [`Color`] stores RGBA components as `f32` in `[0.0, 1.0]`. It parses the CSS
//! forms found in theme files (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`,
//! `hsl()`, `hsla()` and a handful of named colors), converts back to hex, mixes
//! two colors and computes WCAG relative luminance / contrast ratio.
//!
//! # Examples
//!
//! ```
//! use triton_core::types::Color;
//! use std::str::FromStr;
//!
//! let navy = Color::from_str("#0B2244").unwrap();
//! assert_eq!(navy.to_rgb8(), (11, 34, 68));
//!
//! let grey = Color::BLACK.mix(&Color::WHITE, 0.5);
//! assert_eq!(grey.to_hex(), "#808080");
//! ```

use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Invalid hex color string format: '{0}'. Expected #RGB, #RGBA, #RRGGBB, or #RRGGBBAA.")]
    InvalidHexFormat(String),

    #[error("Invalid hex digit in '{input_str}': {source}")]
    InvalidHexDigit {
        input_str: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid hex color string length: '{0}'. Expected 3, 4, 6, or 8 characters after '#'.")]
    InvalidHexLength(String),

    /// Malformed `rgb()`/`hsl()` strings and unsupported formats.
    #[error("Invalid color string format: {0}")]
    InvalidFormat(String),
}

/// An RGBA color with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("lime", (0, 255, 0)),
    ("aqua", (0, 255, 255)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("purple", (128, 0, 128)),
    ("orange", (255, 165, 0)),
];

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// Creates a color, clamping every component into `[0.0, 1.0]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Creates an opaque color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::new(r, g, b, 1.0)
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex_str: &str) -> Result<Self, ColorParseError> {
        let input = hex_str
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::InvalidHexFormat(hex_str.to_string()))?;
        if !input.is_ascii() {
            return Err(ColorParseError::InvalidHexFormat(hex_str.to_string()));
        }

        let component = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|e| ColorParseError::InvalidHexDigit {
                input_str: s.to_string(),
                source: e,
            })
        };
        let short = |s: &str| component(s).map(|v| (v << 4) | v);

        match input.len() {
            3 => Ok(Color::from_rgb8(short(&input[0..1])?, short(&input[1..2])?, short(&input[2..3])?)),
            4 => Ok(Color::from_rgba8(
                short(&input[0..1])?,
                short(&input[1..2])?,
                short(&input[2..3])?,
                short(&input[3..4])?,
            )),
            6 => Ok(Color::from_rgb8(
                component(&input[0..2])?,
                component(&input[2..4])?,
                component(&input[4..6])?,
            )),
            8 => Ok(Color::from_rgba8(
                component(&input[0..2])?,
                component(&input[2..4])?,
                component(&input[4..6])?,
                component(&input[6..8])?,
            )),
            _ => Err(ColorParseError::InvalidHexLength(hex_str.to_string())),
        }
    }

    /// Creates an opaque color from hue (degrees), saturation and lightness (`[0.0, 1.0]`).
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Color::rgb(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h / 360.0;

        Color::rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Returns `(h, s, l)` with hue in degrees. Alpha is ignored.
    pub fn to_hsl(&self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };
        (h * 60.0, s, l)
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        )
    }

    /// `#rrggbb`, alpha ignored.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Linear mix towards `other`. `weight` 0.0 keeps `self`, 1.0 yields `other`.
    pub fn mix(&self, other: &Color, weight: f32) -> Self {
        let w = weight.clamp(0.0, 1.0);
        Color::new(
            self.r + (other.r - self.r) * w,
            self.g + (other.g - self.g) * w,
            self.b + (other.b - self.b) * w,
            self.a + (other.a - self.a) * w,
        )
    }

    /// Adds `amount` to the HSL lightness.
    pub fn adjust_lightness(&self, amount: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        let mut adjusted = Color::from_hsl(h, s, l + amount);
        adjusted.a = self.a;
        adjusted
    }

    /// WCAG 2.x relative luminance.
    pub fn relative_luminance(&self) -> f32 {
        fn channel(c: f32) -> f32 {
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// WCAG contrast ratio, between 1.0 and 21.0.
    pub fn contrast_ratio(&self, other: &Color) -> f32 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (lighter, darker) = if a > b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Looks up a CSS named color (case-insensitive). Only the basic palette is known.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower == "transparent" {
            return Some(Color::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, (r, g, b))| Color::from_rgb8(*r, *g, *b))
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn function_args<'a>(s: &'a str, prefix: &str) -> Option<Vec<&'a str>> {
    s.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(')'))
        .map(|inner| inner.split(',').map(str::trim).collect())
}

fn parse_component<T: FromStr>(part: &str, what: &str, input: &str) -> Result<T, ColorParseError>
where
    T::Err: fmt::Display,
{
    part.parse::<T>()
        .map_err(|e| ColorParseError::InvalidFormat(format!("Invalid {} component in '{}': {}", what, input, e)))
}

fn parse_unit_fraction(part: &str, what: &str, input: &str) -> Result<f32, ColorParseError> {
    match part.strip_suffix('%') {
        Some(number) => Ok(parse_component::<f32>(number, what, input)? / 100.0),
        None => parse_component::<f32>(part, what, input),
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        if s.starts_with('#') {
            return Color::from_hex(s);
        }
        let lower = s.to_ascii_lowercase();

        if let Some(parts) = function_args(&lower, "rgba(").or_else(|| function_args(&lower, "rgb(")) {
            let expected = if lower.starts_with("rgba(") { 4 } else { 3 };
            if parts.len() != expected {
                return Err(ColorParseError::InvalidFormat(format!("Invalid RGB format: {}", raw)));
            }
            let r = parse_component::<u8>(parts[0], "red", raw)?;
            let g = parse_component::<u8>(parts[1], "green", raw)?;
            let b = parse_component::<u8>(parts[2], "blue", raw)?;
            let a = match parts.get(3) {
                Some(alpha) => parse_component::<f32>(alpha, "alpha", raw)?,
                None => 1.0,
            };
            return Ok(Color::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, a));
        }

        if let Some(parts) = function_args(&lower, "hsla(").or_else(|| function_args(&lower, "hsl(")) {
            let expected = if lower.starts_with("hsla(") { 4 } else { 3 };
            if parts.len() != expected {
                return Err(ColorParseError::InvalidFormat(format!("Invalid HSL format: {}", raw)));
            }
            let h = parse_component::<f32>(parts[0], "hue", raw)?;
            let sat = parse_unit_fraction(parts[1], "saturation", raw)?;
            let light = parse_unit_fraction(parts[2], "lightness", raw)?;
            let mut color = Color::from_hsl(h, sat, light);
            if let Some(alpha) = parts.get(3) {
                color.a = parse_component::<f32>(alpha, "alpha", raw)?.clamp(0.0, 1.0);
            }
            return Ok(color);
        }

        Color::from_name(&lower)
            .ok_or_else(|| ColorParseError::InvalidFormat(format!("Unsupported color format: {}", raw)))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "{}", self.to_hex())
        } else {
            let (r, g, b) = self.to_rgb8();
            write!(f, "rgba({}, {}, {}, {})", r, g, b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_str(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#fff", (255, 255, 255))]
    #[case("#0B2244", (11, 34, 68))]
    #[case("rgb(16, 185, 129)", (16, 185, 129))]
    #[case("RGBA(0, 0, 0, 0.4)", (0, 0, 0))]
    #[case("hsl(0, 100%, 50%)", (255, 0, 0))]
    #[case("navy", (0, 0, 128))]
    fn parses_supported_formats(#[case] input: &str, #[case] expected: (u8, u8, u8)) {
        let color = Color::from_str(input).unwrap();
        assert_eq!(color.to_rgb8(), expected);
    }

    #[test]
    fn rgba_keeps_alpha() {
        let color = Color::from_str("rgba(0, 0, 0, 0.4)").unwrap();
        assert!((color.a - 0.4).abs() < f32::EPSILON);
        assert_eq!(color.to_string(), "rgba(0, 0, 0, 0.4)");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(Color::from_hex("#12345"), Err(ColorParseError::InvalidHexLength(_))));
        assert!(matches!(Color::from_hex("#zzz"), Err(ColorParseError::InvalidHexDigit { .. })));
        assert!(matches!(Color::from_str("rgb(1, 2)"), Err(ColorParseError::InvalidFormat(_))));
        assert!(matches!(Color::from_str("chartreuse-ish"), Err(ColorParseError::InvalidFormat(_))));
    }

    #[test]
    fn mix_interpolates_linearly() {
        let grey = Color::BLACK.mix(&Color::WHITE, 0.5);
        assert_eq!(grey.to_rgb8(), (128, 128, 128));
        assert_eq!(Color::BLACK.mix(&Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::BLACK.mix(&Color::WHITE, 1.0), Color::WHITE);
    }

    #[test]
    fn hsl_round_trip() {
        let original = Color::from_rgb8(41, 127, 183);
        let (h, s, l) = original.to_hsl();
        assert_eq!(Color::from_hsl(h, s, l).to_rgb8(), original.to_rgb8());
    }

    #[test]
    fn contrast_ratio_extremes() {
        let ratio = Color::BLACK.contrast_ratio(&Color::WHITE);
        assert!((ratio - 21.0).abs() < 0.01);
        assert!((Color::WHITE.contrast_ratio(&Color::WHITE) - 1.0).abs() < 0.001);
    }

    #[test]
    fn serde_uses_css_strings() {
        let json = serde_json::to_string(&Color::from_rgb8(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Color = serde_json::from_str("\"rgb(0, 255, 0)\"").unwrap();
        assert_eq!(back.to_rgb8(), (0, 255, 0));
    }
}
