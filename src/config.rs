//! Project configuration module.
//!
//! Handles loading, normalizing, and validating `screenshot-cropper.json`.
//! Stock defaults are deep-merged with the user file, so a config only needs
//! the sections it cares about.
//!
//! ## Config File Location
//!
//! In directory mode the file sits in the project root:
//!
//! ```text
//! project/
//! ├── screenshot-cropper.json   # (or screenshot-cropper.toml)
//! ├── fonts/                    # Optional font files
//! └── input/
//!     ├── screenshots/          # 1.png, 2.png, ...
//!     ├── locales/              # en.json, de.json, ...
//!     └── background.png
//! ```
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "crop": { "top": 0, "left": 0, "right": 0, "bottom": 0 },
//!   "background": {
//!     "file": "background.png",
//!     "position": { "x": 100, "y": 1200 },
//!     "size": { "width": 1000, "height": 1800 }
//!   },
//!   "text": {
//!     "font": {
//!       "files": { "default": "Arial.ttf", "ja": "NotoSansJP.ttf" },
//!       "size": 24,
//!       "align": "center",
//!       "vertical-align": "top",
//!       "x": 50, "y": 50, "width": 300, "height": 100,
//!       "color": { "r": 0, "g": 0, "b": 0 }
//!     }
//!   },
//!   "overlay": { "file": "frame.png", "position": { "x": 0, "y": 0 } },
//!   "export": { "format": "png", "quality": 90, "keep_cropped": false, "lossless": false },
//!   "directories": { "screenshots": "...", "locales": "...", "output": "...", "assets": "..." },
//!   "processing": { "max_processes": 4 }
//! }
//! ```
//!
//! Numeric fields are read as signed integers; out-of-range values are logged
//! and clamped while converting to the [`imaging`](crate::imaging) and
//! [`text`](crate::text) value types. Unknown keys are rejected.

use crate::imaging::{CropSpec, ExportFormat, ExportSpec, OverlaySpec, PlacementSpec, Quality};
use crate::text::{
    DEFAULT_FONT_KEY, FALLBACK_FONT_FILE, HorizontalAlign, MAX_FONT_SIZE, TextBlockSpec, TextBox,
    VerticalAlign,
};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["screenshot-cropper.json", "screenshot-cropper.toml"];

const LEGACY_CROP_KEYS: [&str; 4] = ["top", "left", "right", "bottom"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `screenshot-cropper.json`.
///
/// Every section is optional. Missing `background`, `text` or `overlay`
/// sections disable that layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotConfig {
    pub crop: CropConfig,
    pub background: Option<BackgroundConfig>,
    pub text: Option<TextConfig>,
    pub overlay: Option<OverlayConfig>,
    pub export: ExportConfig,
    pub directories: DirectoriesConfig,
    pub processing: ProcessingConfig,
}

/// Pixel insets removed from each edge of every screenshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub top: i64,
    pub left: i64,
    pub right: i64,
    pub bottom: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PositionConfig {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeConfig {
    pub width: i64,
    pub height: i64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

/// Background canvas and where the screenshot lands on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub file: Option<String>,
    pub position: PositionConfig,
    pub size: SizeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub font: FontConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

/// Caption font and box settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Locale code (or `default`) → font file.
    pub files: BTreeMap<String, String>,
    pub size: i64,
    pub align: String,
    #[serde(rename = "vertical-align")]
    pub vertical_align: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub color: ColorConfig,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            files: BTreeMap::from([(DEFAULT_FONT_KEY.to_string(), FALLBACK_FONT_FILE.to_string())]),
            size: 24,
            align: "left".to_string(),
            vertical_align: "top".to_string(),
            x: 0,
            y: 0,
            width: 100,
            height: 100,
            color: ColorConfig::default(),
        }
    }
}

/// Decorative layer pasted last, at native size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub file: Option<String>,
    pub position: PositionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: String,
    pub quality: i64,
    pub keep_cropped: bool,
    pub lossless: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
            quality: 90,
            keep_cropped: false,
            lossless: false,
        }
    }
}

/// Input and output locations, used with `--config`.
///
/// Relative paths resolve against the config file's directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoriesConfig {
    pub screenshots: Option<String>,
    pub locales: Option<String>,
    pub output: Option<String>,
    pub assets: Option<String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compositing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

fn non_negative(field: &str, value: i64) -> u32 {
    if value < 0 {
        tracing::warn!(field, value, "negative value, using 0");
        return 0;
    }
    value.min(u32::MAX as i64) as u32
}

fn positive_or(field: &str, value: i64, default: u32) -> u32 {
    if value <= 0 {
        tracing::warn!(field, value, default, "non-positive value, using default");
        return default;
    }
    value.min(u32::MAX as i64) as u32
}

fn channel(field: &str, value: i64) -> u8 {
    if !(0..=255).contains(&value) {
        tracing::warn!(field, value, "color channel out of range, clamping");
    }
    value.clamp(0, 255) as u8
}

impl ScreenshotConfig {
    /// Crop insets; negative values clamp to zero.
    pub fn crop_settings(&self) -> CropSpec {
        let c = &self.crop;
        for (name, value) in [
            ("crop.top", c.top),
            ("crop.left", c.left),
            ("crop.right", c.right),
            ("crop.bottom", c.bottom),
        ] {
            if value < 0 {
                tracing::warn!(field = name, value, "negative crop inset, using 0");
            }
        }
        CropSpec::new(c.top, c.left, c.right, c.bottom)
    }

    /// Background placement, or `None` when no background file is configured.
    pub fn background_settings(&self) -> Option<PlacementSpec> {
        let bg = self.background.as_ref()?;
        let Some(file) = bg.file.clone() else {
            tracing::error!("background section has no file, background disabled");
            return None;
        };
        Some(PlacementSpec {
            file,
            x: non_negative("background.position.x", bg.position.x),
            y: non_negative("background.position.y", bg.position.y),
            target_width: positive_or("background.size.width", bg.size.width, 100),
            target_height: positive_or("background.size.height", bg.size.height, 100),
        })
    }

    /// Overlay layer, or `None` when no overlay file is configured.
    pub fn overlay_settings(&self) -> Option<OverlaySpec> {
        let overlay = self.overlay.as_ref()?;
        let Some(file) = overlay.file.clone() else {
            tracing::error!("overlay section has no file, overlay disabled");
            return None;
        };
        Some(OverlaySpec {
            file,
            x: overlay.position.x,
            y: overlay.position.y,
        })
    }

    /// Caption settings, or `None` when the `text` section is absent.
    pub fn text_settings(&self) -> Option<TextBlockSpec> {
        let font = &self.text.as_ref()?.font;

        if !font.files.contains_key(DEFAULT_FONT_KEY) {
            tracing::warn!(font = FALLBACK_FONT_FILE, "no default font specified");
        }
        let align = HorizontalAlign::parse(&font.align).unwrap_or_else(|| {
            tracing::warn!(value = %font.align, "invalid align, using left");
            HorizontalAlign::Left
        });
        let vertical_align = VerticalAlign::parse(&font.vertical_align).unwrap_or_else(|| {
            tracing::warn!(value = %font.vertical_align, "invalid vertical-align, using top");
            VerticalAlign::Top
        });

        let mut font_size = positive_or("text.font.size", font.size, 24);
        if font_size > MAX_FONT_SIZE {
            tracing::warn!(
                value = font_size,
                max = MAX_FONT_SIZE,
                "font size too large, clamping"
            );
            font_size = MAX_FONT_SIZE;
        }

        Some(TextBlockSpec::new(
            font.files.clone(),
            font_size,
            align,
            vertical_align,
            TextBox {
                x: non_negative("text.font.x", font.x) as i64,
                y: non_negative("text.font.y", font.y) as i64,
                width: positive_or("text.font.width", font.width, 100),
                height: positive_or("text.font.height", font.height, 100),
            },
            Rgb([
                channel("text.font.color.r", font.color.r),
                channel("text.font.color.g", font.color.g),
                channel("text.font.color.b", font.color.b),
            ]),
        ))
    }

    /// Export settings; always present.
    pub fn export_settings(&self) -> ExportSpec {
        let e = &self.export;
        let format = ExportFormat::parse(&e.format).unwrap_or_else(|| {
            tracing::warn!(value = %e.format, "unknown export format, using png");
            ExportFormat::Png
        });
        if !(1..=100).contains(&e.quality) {
            tracing::warn!(value = e.quality, "export quality out of range, clamping");
        }
        ExportSpec {
            format,
            quality: Quality::new(e.quality.clamp(1, 100) as u32),
            keep_cropped: e.keep_cropped,
            lossless: e.lossless,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a JSON object.
///
/// This is the base layer that user overrides merge on top of.
pub fn stock_defaults_value() -> serde_json::Value {
    serde_json::to_value(ScreenshotConfig::default()).unwrap_or_default()
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Objects are merged key-by-key (overlay keys override base keys).
/// - Non-object values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_json(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Move root-level `top/left/right/bottom` keys under `crop`.
///
/// Older configs kept the crop insets at the root. When a `crop` section is
/// present the root keys are dropped instead.
pub fn normalize_legacy_crop(value: &mut serde_json::Value) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    let legacy: Vec<(String, serde_json::Value)> = LEGACY_CROP_KEYS
        .iter()
        .filter_map(|key| root.remove(*key).map(|v| (key.to_string(), v)))
        .collect();
    if legacy.is_empty() {
        return;
    }
    if root.contains_key("crop") {
        tracing::warn!("ignoring root-level crop keys, a crop section is present");
        return;
    }
    tracing::warn!("using deprecated root-level crop keys, move them under \"crop\"");
    root.insert(
        "crop".to_string(),
        serde_json::Value::Object(legacy.into_iter().collect()),
    );
}

/// Read a config file as a raw JSON value. `.toml` files are parsed as TOML.
pub fn load_raw_config(path: &Path) -> Result<serde_json::Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    let value = if is_toml {
        let table: toml::Value = toml::from_str(&content)?;
        serde_json::to_value(table)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(value)
}

/// Merge an overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(mut overlay: serde_json::Value) -> Result<ScreenshotConfig, ConfigError> {
    if !overlay.is_object() {
        return Err(ConfigError::Validation(
            "configuration root must be an object".into(),
        ));
    }
    normalize_legacy_crop(&mut overlay);
    let merged = merge_json(stock_defaults_value(), overlay);
    let config: ScreenshotConfig = serde_json::from_value(merged)?;
    config.validate()?;
    Ok(config)
}

impl ScreenshotConfig {
    /// Reject values that cannot be clamped into something meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Find the config file inside a project directory.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<ScreenshotConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(overlay)
}

/// Returns a stock configuration with every section filled in.
///
/// JSON has no comments; the module docs describe each key. Used by the
/// `gen-config` CLI command.
pub fn stock_config_json() -> &'static str {
    r##"{
  "crop": { "top": 0, "left": 0, "right": 0, "bottom": 0 },

  "background": {
    "file": "background.png",
    "position": { "x": 0, "y": 0 },
    "size": { "width": 1000, "height": 1800 }
  },

  "text": {
    "font": {
      "files": { "default": "Arial.ttf" },
      "size": 24,
      "align": "center",
      "vertical-align": "top",
      "x": 0,
      "y": 0,
      "width": 1000,
      "height": 200,
      "color": { "r": 0, "g": 0, "b": 0 }
    }
  },

  "overlay": {
    "file": "overlay.png",
    "position": { "x": 0, "y": 0 }
  },

  "export": {
    "format": "png",
    "quality": 90,
    "keep_cropped": false,
    "lossless": false
  },

  "processing": {
    "max_processes": null
  }
}
"##
}
