//! Text and element size estimates
//!
//! The bundled pixel font has square glyphs, so text width is estimated as
//! one font size per character and line height as 1.2× the font size.

use spellfloat_core::{RowStyle, TextStyle};

/// Vertical margin above and below labels and totals rows
pub const LABEL_MARGIN: i32 = 5;
/// Vertical margin above and below event rows
pub const ROW_MARGIN: i32 = 10;
/// Horizontal gap between a row's icon and its text
pub const ICON_GAP: i32 = 8;

pub fn line_height(font_size: u32) -> i32 {
    (font_size as f32 * 1.2).ceil() as i32
}

pub fn text_width(text: &str, font_size: u32) -> i32 {
    text.chars().count() as i32 * font_size as i32
}

/// Height of a subject label or totals row
pub fn label_height(style: &TextStyle) -> i32 {
    line_height(style.font_size) + 2 * LABEL_MARGIN
}

pub fn row_height(style: &RowStyle) -> i32 {
    (style.icon_height as i32).max(line_height(style.text.font_size)) + 2 * ROW_MARGIN
}

pub fn row_width(text: &str, style: &RowStyle) -> i32 {
    style.icon_width as i32 + ICON_GAP + text_width(text, style.text.font_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(font_size: u32) -> TextStyle {
        TextStyle {
            font_size,
            color: "white".into(),
        }
    }

    #[test]
    fn test_label_height_includes_margins() {
        assert_eq!(line_height(20), 24);
        assert_eq!(label_height(&text(20)), 34);
        assert_eq!(label_height(&text(10)), 22);
    }

    #[test]
    fn test_row_height_takes_taller_of_icon_and_text() {
        let mut style = RowStyle {
            icon_width: 64,
            icon_height: 64,
            text: text(20),
        };
        assert_eq!(row_height(&style), 84);

        style.icon_height = 8;
        assert_eq!(row_height(&style), 24 + 20);
    }

    #[test]
    fn test_widths() {
        assert_eq!(text_width("", 20), 0);
        assert_eq!(text_width("350", 20), 60);
        let style = RowStyle {
            icon_width: 64,
            icon_height: 64,
            text: text(20),
        };
        assert_eq!(row_width("350", &style), 64 + ICON_GAP + 60);
    }
}
