//! Shade palettes for brand and status colors.

use std::collections::BTreeMap;
use triton_core::types::{Color, ColorParseError};

use super::discovery::SHADES;
use super::preset::ColorOverride;

/// Override ids that carry a derived palette.
pub const PALETTE_TOKENS: &[&str] = &["primary", "secondary", "success", "info", "warning", "danger"];

pub fn should_have_palette(token_id: &str) -> bool {
    PALETTE_TOKENS.contains(&token_id)
}

/// Eleven shades `50..950` around `base`.
///
/// Shade 500 is the base color. Lighter shades mix towards white in steps of 19%,
/// darker shades towards black in steps of 15%.
pub fn generate_palette(base: &str) -> Result<BTreeMap<u16, String>, ColorParseError> {
    let color: Color = base.trim().parse()?;
    let palette = SHADES
        .iter()
        .enumerate()
        .map(|(index, &shade)| {
            let shaded = match index {
                i if i < 5 => color.mix(&Color::WHITE, (5 - i) as f32 * 0.19),
                5 => color,
                i => color.mix(&Color::BLACK, (i - 5) as f32 * 0.15),
            };
            (shade, shaded.to_hex())
        })
        .collect();
    Ok(palette)
}

/// Sets the palette of a brand or status override. With `force` an existing palette
/// is recomputed; otherwise only a missing one is filled in. Unparseable values are
/// left without a palette.
pub fn refresh_palette(color_override: &mut ColorOverride, force: bool) {
    if !should_have_palette(&color_override.token_id) {
        return;
    }
    if color_override.palette.is_some() && !force {
        return;
    }
    match generate_palette(&color_override.value) {
        Ok(palette) => color_override.palette = Some(palette),
        Err(e) => tracing::warn!(
            "Could not derive palette for '{}' from '{}': {}",
            color_override.token_id,
            color_override.value,
            e
        ),
    }
}
