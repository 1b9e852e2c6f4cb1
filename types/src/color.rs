//! Color parsing for settings values.
//!
//! Settings store colors as strings so the JSON stays hand-editable. Both
//! named colors and `#rrggbb` / `#rrggbbaa` hex are accepted.

/// Named colors understood in settings files (SVG color keyword values)
const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("white", [255, 255, 255, 255]),
    ("black", [0, 0, 0, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("gold", [255, 215, 0, 255]),
    ("transparent", [0, 0, 0, 0]),
];

/// Fallback used when a configured color cannot be parsed
pub const FALLBACK_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Parse a color name or hex string into RGBA.
///
/// # Examples
/// ```
/// use spellfloat_types::color::parse_color;
/// assert_eq!(parse_color("red"), Some([255, 0, 0, 255]));
/// assert_eq!(parse_color(" Blue "), Some([0, 0, 255, 255]));
/// assert_eq!(parse_color("#10ff20"), Some([16, 255, 32, 255]));
/// assert_eq!(parse_color("#10ff2080"), Some([16, 255, 32, 128]));
/// assert_eq!(parse_color("chartreuse-ish"), None);
/// ```
pub fn parse_color(value: &str) -> Option<[u8; 4]> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgba)| *rgba)
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}
