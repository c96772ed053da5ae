//! Shared test utilities for the screenshot-cropper test suite.
//!
//! Builds throwaway project directories with synthetic images, so tests never
//! depend on binary fixtures checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! setup_project(tmp.path());
//! let (paths, config) = load_project(tmp.path());
//! ```
//!
//! The project looks like this:
//!
//! ```text
//! screenshot-cropper.json      # background + caption + overlay, font missing
//! input/
//! ├── background.png           # BACKGROUND_SIZE, solid blue
//! ├── overlay.png              # 40x40, half-transparent white
//! ├── screenshots/
//! │   ├── 1.png                # SCREENSHOT_SIZE, gradient
//! │   └── 2.png
//! └── locales/
//!     ├── de.json              # {"Text_1": ..., "Text_2": ...}
//!     └── en.json
//! ```

use std::path::Path;

use image::{Rgba, RgbaImage};
use serde_json::json;

use crate::config::{ScreenshotConfig, load_config};
use crate::paths::ProjectPaths;

pub const SCREENSHOT_SIZE: (u32, u32) = (120, 200);
pub const BACKGROUND_SIZE: (u32, u32) = (300, 500);

// =========================================================================
// Images
// =========================================================================

/// Single-color RGBA image.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Deterministic gradient so crops and pastes are checkable per pixel.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    })
}

/// Write a PNG, creating parent directories.
pub fn write_png(path: &Path, image: &RgbaImage) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image.save(path).unwrap();
}

// =========================================================================
// Project fixtures
// =========================================================================

pub fn write_config(dir: &Path, config: &serde_json::Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("screenshot-cropper.json"),
        serde_json::to_string_pretty(config).unwrap(),
    )
    .unwrap();
}

pub fn write_locale(dir: &Path, code: &str, texts: &serde_json::Value) {
    let path = dir.join("input/locales").join(format!("{code}.json"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, texts.to_string()).unwrap();
}

/// Config used by [`setup_project`].
pub fn project_config() -> serde_json::Value {
    json!({
        "crop": { "top": 20, "left": 0, "right": 0, "bottom": 0 },
        "background": {
            "file": "background.png",
            "position": { "x": 20, "y": 150 },
            "size": { "width": 260, "height": 300 }
        },
        "text": {
            "font": {
                "files": { "default": "Missing.ttf" },
                "size": 16,
                "align": "center",
                "vertical-align": "top",
                "x": 10, "y": 10, "width": 280, "height": 120,
                "color": { "r": 255, "g": 255, "b": 255 }
            }
        },
        "overlay": { "file": "overlay.png", "position": { "x": 0, "y": 0 } }
    })
}

/// Create the two-screenshot, two-locale project described in the module docs.
pub fn setup_project(dir: &Path) {
    write_config(dir, &project_config());

    let input = dir.join("input");
    let (bw, bh) = BACKGROUND_SIZE;
    write_png(&input.join("background.png"), &solid(bw, bh, Rgba([0, 0, 255, 255])));
    write_png(&input.join("overlay.png"), &solid(40, 40, Rgba([255, 255, 255, 128])));

    let (sw, sh) = SCREENSHOT_SIZE;
    for name in ["1.png", "2.png"] {
        write_png(&input.join("screenshots").join(name), &gradient(sw, sh));
    }

    write_locale(dir, "de", &json!({ "Text_1": "Gewohnheiten", "Text_2": "Auf Kurs" }));
    write_locale(dir, "en", &json!({ "Text_1": "Track habits", "Text_2": "Stay on course" }));
}

/// Resolve directory-mode paths and load the config.
pub fn load_project(dir: &Path) -> (ProjectPaths, ScreenshotConfig) {
    let paths = ProjectPaths::from_directory(dir).unwrap();
    let config = load_config(&paths.config_file).unwrap();
    (paths, config)
}
