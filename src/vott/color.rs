//! Hex color helpers.

use std::ops::RangeInclusive;

/// Channel range for tag colors, keeping clear of near-black and near-white.
pub const TAG_CHANNEL_RANGE: RangeInclusive<u8> = 40..=200;

/// Clamp an arbitrary channel value into `[0, 255]`.
pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Render `#rrggbb` in lowercase hex.
pub fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}
