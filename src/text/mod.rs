//! Caption text: settings, measurement, line breaking, and rasterization.
//!
//! ```text
//! TextBlockSpec + locale ──► FontLibrary::face ──► Face (outline | built-in bitmap)
//!                                                    │
//! text ──► break_lines ──► layout_lines ──► draw_lines onto the composite
//! ```
//!
//! Layout is a pure function of the text, a [`TextMeasure`] and the box, so it
//! is tested with fixed-width stub measures; rendering needs a real [`Face`].
//! The locale travels as an explicit argument through every call; nothing in
//! this module keeps per-render state.

pub mod bitmap;
pub mod font;
pub mod layout;
pub mod render;

use image::Rgb;
use std::collections::BTreeMap;

pub use font::{Face, FontLibrary, SelectedFace};
pub use layout::{PlacedLine, TextBox, break_lines, layout_lines, line_spacing, wrap_text};
pub use render::{draw_lines, render_text};

/// Key of the font used when a locale has no font of its own.
pub const DEFAULT_FONT_KEY: &str = "default";

/// Font file assumed when the configuration names no default.
pub const FALLBACK_FONT_FILE: &str = "Arial.ttf";

/// Largest caption size in pixels.
pub const MAX_FONT_SIZE: u32 = 2048;

/// Pixel measurements of a run of text in a specific face and size.
pub trait TextMeasure {
    /// Horizontal advance of the whole string.
    fn text_width(&self, text: &str) -> u32;

    /// Height of the inked area of the string.
    fn text_height(&self, text: &str) -> u32;
}

/// Horizontal alignment of each line inside the text box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Vertical alignment of the whole block inside the text box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "middle" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Caption settings for every composite in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlockSpec {
    /// Locale code (or [`DEFAULT_FONT_KEY`]) → font file. Always has a default.
    pub font_files: BTreeMap<String, String>,
    /// Font size in pixels.
    pub font_size: u32,
    pub align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub bounds: TextBox,
    pub color: Rgb<u8>,
}

impl TextBlockSpec {
    /// Build a spec, inserting [`FALLBACK_FONT_FILE`] as the default font
    /// when `font_files` has none.
    pub fn new(
        mut font_files: BTreeMap<String, String>,
        font_size: u32,
        align: HorizontalAlign,
        vertical_align: VerticalAlign,
        bounds: TextBox,
        color: Rgb<u8>,
    ) -> Self {
        font_files
            .entry(DEFAULT_FONT_KEY.to_string())
            .or_insert_with(|| FALLBACK_FONT_FILE.to_string());
        Self {
            font_files,
            font_size: font_size.max(1),
            align,
            vertical_align,
            bounds,
            color,
        }
    }

    /// Font file for `locale`, falling back to the default entry.
    pub fn font_file_for(&self, locale: Option<&str>) -> &str {
        select_font_file(&self.font_files, locale)
    }
}

pub(crate) fn select_font_file<'a>(files: &'a BTreeMap<String, String>, locale: Option<&str>) -> &'a str {
    locale
        .and_then(|l| files.get(l))
        .or_else(|| files.get(DEFAULT_FONT_KEY))
        .map(String::as_str)
        .unwrap_or(FALLBACK_FONT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(files: &[(&str, &str)]) -> TextBlockSpec {
        TextBlockSpec::new(
            files
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            24,
            HorizontalAlign::Left,
            VerticalAlign::Top,
            TextBox {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
            },
            Rgb([0, 0, 0]),
        )
    }

    #[test]
    fn missing_default_font_gets_fallback() {
        let spec = spec_with(&[("ja", "NotoSansJP.ttf")]);
        assert_eq!(spec.font_files["default"], "Arial.ttf");
    }

    #[test]
    fn locale_font_preferred_over_default() {
        let spec = spec_with(&[("default", "Inter.ttf"), ("ja", "NotoSansJP.ttf")]);
        assert_eq!(spec.font_file_for(Some("ja")), "NotoSansJP.ttf");
        assert_eq!(spec.font_file_for(Some("de")), "Inter.ttf");
        assert_eq!(spec.font_file_for(None), "Inter.ttf");
    }

    #[test]
    fn align_parse_rejects_unknown() {
        assert_eq!(HorizontalAlign::parse("center"), Some(HorizontalAlign::Center));
        assert_eq!(HorizontalAlign::parse("justify"), None);
        assert_eq!(VerticalAlign::parse("middle"), Some(VerticalAlign::Middle));
        assert_eq!(VerticalAlign::parse("baseline"), None);
    }
}
