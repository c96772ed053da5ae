//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are parsed
//! once from configuration at batch start and stay immutable for the run;
//! every composition job reads them by reference.
//!
//! ## Types
//!
//! - [`CropSpec`]: Pixel insets removed from each edge. Negative values clamp to 0.
//! - [`PlacementSpec`]: Where the cropped foreground lands on the background.
//! - [`OverlaySpec`]: Decorative image alpha-composited last, at native size.
//! - [`ExportSpec`]: Output format and encoder knobs.
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Insets (in pixels) trimmed from each edge of a source screenshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropSpec {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropSpec {
    /// Build from raw (possibly negative) config values; negatives clamp to 0.
    pub fn new(top: i64, left: i64, right: i64, bottom: i64) -> Self {
        Self {
            top: non_negative(top),
            left: non_negative(left),
            right: non_negative(right),
            bottom: non_negative(bottom),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for CropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top={} left={} right={} bottom={}",
            self.top, self.left, self.right, self.bottom
        )
    }
}

/// Placement of the cropped foreground on a background canvas.
///
/// `target_width` is authoritative: the foreground keeps its own aspect
/// ratio, so `target_height` is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementSpec {
    pub file: String,
    pub x: u32,
    pub y: u32,
    pub target_width: u32,
    pub target_height: u32,
}

/// Decorative layer pasted with alpha at an absolute position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySpec {
    pub file: String,
    pub x: i64,
    pub y: i64,
}

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Webp,
}

impl ExportFormat {
    /// Parse a config value; anything unrecognised is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// How every output file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSpec {
    pub format: ExportFormat,
    pub quality: Quality,
    /// Also write the cropped (pre-composite) image under `output/cropped/`.
    pub keep_cropped: bool,
    /// Lossless WebP (preserves pixels exactly); otherwise WebP is lossy at `quality`.
    pub lossless: bool,
}

impl Default for ExportSpec {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: Quality::default(),
            keep_cropped: false,
            lossless: false,
        }
    }
}

fn non_negative(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}
