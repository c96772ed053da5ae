//! Centralized filename handling for screenshots and their outputs.
//!
//! Screenshots are matched to locale texts by a number taken from the file
//! name. Outputs encode the locale twice (subdirectory and suffix) so files
//! from different locales never collide even when flattened:
//!
//! - `input/screenshots/3.png` + `de` → `output/de/3_de.png`
//! - `input/screenshots/3.png` without locales → `output/3.png`
//! - cropped copy → `output/cropped/3.png`

use crate::imaging::ExportFormat;
use std::path::{Path, PathBuf};

/// Extract the screenshot number from a file stem.
///
/// Handles these patterns:
/// - `"7"` → `Some(7)`
/// - `"screenshot_07"` → `Some(7)`
/// - `"img12_v3"` → `Some(12)` (first run of digits)
/// - `"cover"` → `None`
pub fn extract_screenshot_number(stem: &str) -> Option<u32> {
    if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) {
        return stem.parse().ok();
    }
    let start = stem.find(|c: char| c.is_ascii_digit())?;
    let digits: String = stem[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Output path for one locale: `output/{locale}/{stem}_{locale}.{ext}`.
pub fn localized_output_path(
    output_dir: &Path,
    stem: &str,
    locale: &str,
    format: ExportFormat,
) -> PathBuf {
    output_dir
        .join(locale)
        .join(format!("{stem}_{locale}.{}", format.extension()))
}

/// Output path when no locales are in play: `output/{stem}.{ext}`.
pub fn plain_output_path(output_dir: &Path, stem: &str, format: ExportFormat) -> PathBuf {
    output_dir.join(format!("{stem}.{}", format.extension()))
}

/// Where a `keep_cropped` copy goes: `{cropped_dir}/{stem}.{ext}`.
pub fn cropped_output_path(cropped_dir: &Path, stem: &str, format: ExportFormat) -> PathBuf {
    cropped_dir.join(format!("{stem}.{}", format.extension()))
}
