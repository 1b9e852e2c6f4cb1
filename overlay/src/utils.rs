//! Common utility functions for overlay rendering

use tiny_skia::Color;

use spellfloat_types::color::{FALLBACK_COLOR, parse_color};

/// Convert [u8; 4] RGBA array to tiny_skia Color
#[inline]
pub fn color_from_rgba(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Resolve a configured color name, falling back to white
pub fn resolve_color(value: &str) -> Color {
    match parse_color(value) {
        Some(rgba) => color_from_rgba(rgba),
        None => {
            tracing::warn!(color = value, "unknown color, using white");
            color_from_rgba(FALLBACK_COLOR)
        }
    }
}

/// Dim grey used for anchor markers
pub fn marker_color() -> Color {
    Color::from_rgba8(160, 160, 160, 200)
}

/// Scale a color's alpha by `opacity` (0.0 – 1.0)
pub fn with_opacity(color: Color, opacity: f32) -> Color {
    let mut color = color;
    color.set_alpha((color.alpha() * opacity).clamp(0.0, 1.0));
    color
}
