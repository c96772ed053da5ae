//! Font loading and face selection.
//!
//! Every font file named in the text settings is parsed once with `fontdue`
//! when the batch starts. The resulting [`FontLibrary`] is immutable and
//! shared read-only by all jobs; a job picks its face by passing its locale
//! to [`FontLibrary::face`].

use super::bitmap::BitmapFont;
use super::render::blend_pixel;
use super::{TextBlockSpec, TextMeasure, select_font_file};
use crate::paths::AssetRoots;
use fontdue::{Font, FontSettings};
use image::{Rgb, RgbaImage};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("font file not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse font: {0}")]
    Parse(String),
}

/// Parse a TrueType/OpenType font from disk.
pub fn load_font_file(path: &Path) -> Result<Font, FontError> {
    let data = std::fs::read(path)?;
    Font::from_bytes(data, FontSettings::default()).map_err(|e| FontError::Parse(e.to_string()))
}

/// An outline font at a fixed pixel size.
#[derive(Clone)]
pub struct OutlineFace {
    font: Arc<Font>,
    px: f32,
}

impl OutlineFace {
    pub fn new(font: Arc<Font>, px: u32) -> Self {
        Self {
            font,
            px: px as f32,
        }
    }

    fn advance_run(&self, text: &str) -> f32 {
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += self.font.horizontal_kern(p, ch, self.px).unwrap_or(0.0);
            }
            width += self.font.metrics(ch, self.px).advance_width;
            prev = Some(ch);
        }
        width
    }

    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.px)
            .map(|m| m.ascent)
            .unwrap_or(self.px)
    }

    /// Draw `text` with the ascender line at `y`.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i64, y: i64, color: Rgb<u8>) {
        let baseline = (y as f32 + self.ascent()).round() as i64;
        let mut caret = x as f32;
        let mut prev = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                caret += self.font.horizontal_kern(p, ch, self.px).unwrap_or(0.0);
            }
            let (metrics, coverage) = self.font.rasterize(ch, self.px);
            let left = caret.round() as i64 + metrics.xmin as i64;
            let top = baseline - (metrics.ymin as i64 + metrics.height as i64);
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha > 0 {
                        blend_pixel(canvas, left + col as i64, top + row as i64, color, alpha);
                    }
                }
            }
            caret += metrics.advance_width;
            prev = Some(ch);
        }
    }
}

impl TextMeasure for OutlineFace {
    fn text_width(&self, text: &str) -> u32 {
        self.advance_run(text).ceil().max(0.0) as u32
    }

    fn text_height(&self, text: &str) -> u32 {
        let mut top = i32::MIN;
        let mut bottom = i32::MAX;
        for ch in text.chars() {
            let m = self.font.metrics(ch, self.px);
            if m.height == 0 {
                continue;
            }
            top = top.max(m.ymin + m.height as i32);
            bottom = bottom.min(m.ymin);
        }
        if top <= bottom {
            return self.px.round() as u32;
        }
        (top - bottom) as u32
    }
}

/// A face ready to measure and draw.
#[derive(Clone)]
pub enum Face {
    Outline(OutlineFace),
    Builtin(BitmapFont),
}

impl Face {
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i64, y: i64, color: Rgb<u8>) {
        match self {
            Self::Outline(face) => face.draw(canvas, text, x, y, color),
            Self::Builtin(face) => face.draw(canvas, text, x, y, color),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

impl TextMeasure for Face {
    fn text_width(&self, text: &str) -> u32 {
        match self {
            Self::Outline(face) => face.text_width(text),
            Self::Builtin(face) => face.text_width(text),
        }
    }

    fn text_height(&self, text: &str) -> u32 {
        match self {
            Self::Outline(face) => face.text_height(text),
            Self::Builtin(face) => face.text_height(text),
        }
    }
}

/// Result of [`FontLibrary::face`].
pub struct SelectedFace {
    pub face: Face,
    /// The font file that should have been used.
    pub file: String,
    /// True when `file` failed to load and the built-in face stands in.
    pub fallback: bool,
}

/// Fonts for every locale in the batch, loaded once.
#[derive(Clone, Default)]
pub struct FontLibrary {
    files: BTreeMap<String, String>,
    loaded: HashMap<String, Arc<Font>>,
}

impl FontLibrary {
    /// Load every distinct font file referenced by `spec`.
    ///
    /// Files that cannot be found or parsed are logged and left out; their
    /// locales render with the built-in face.
    pub fn load(spec: &TextBlockSpec, roots: &AssetRoots) -> Self {
        let mut loaded = HashMap::new();
        for file in spec.font_files.values() {
            if loaded.contains_key(file) {
                continue;
            }
            let result = roots
                .resolve_font(file)
                .ok_or_else(|| FontError::NotFound(file.clone()))
                .and_then(|path| load_font_file(&path));
            match result {
                Ok(font) => {
                    tracing::debug!(font = %file, "loaded font");
                    loaded.insert(file.clone(), Arc::new(font));
                }
                Err(e) => {
                    tracing::warn!(font = %file, error = %e, "font unavailable, using built-in face");
                }
            }
        }
        Self {
            files: spec.font_files.clone(),
            loaded,
        }
    }

    /// A library where every locale falls back to the built-in face.
    pub fn builtin_only(spec: &TextBlockSpec) -> Self {
        Self {
            files: spec.font_files.clone(),
            loaded: HashMap::new(),
        }
    }

    pub fn is_loaded(&self, file: &str) -> bool {
        self.loaded.contains_key(file)
    }

    /// Face for `locale` at `px`: the locale's font, else the default font,
    /// else the built-in bitmap face.
    pub fn face(&self, locale: Option<&str>, px: u32) -> SelectedFace {
        let file = select_font_file(&self.files, locale).to_string();

        match self.loaded.get(&file) {
            Some(font) => SelectedFace {
                face: Face::Outline(OutlineFace::new(Arc::clone(font), px)),
                file,
                fallback: false,
            },
            None => SelectedFace {
                face: Face::Builtin(BitmapFont::for_size(px)),
                file,
                fallback: true,
            },
        }
    }
}
