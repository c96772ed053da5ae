//! Screenshot discovery.
//!
//! Lists the images directly inside the screenshots directory. Subdirectories
//! and hidden files are ignored; extensions are matched case-insensitively
//! against the formats the backend can decode.
//!
//! ```text
//! input/screenshots/
//! ├── 1.png                 # number 1
//! ├── 2.PNG                 # number 2
//! ├── screenshot_03.jpg     # number 3
//! ├── cover.webp            # no number: matched by position
//! ├── notes.txt             # ignored
//! └── .DS_Store             # ignored
//! ```
//!
//! Assets come back sorted by file name so sequential positions are stable.

use crate::imaging::supported_input_extensions;
use crate::naming::extract_screenshot_number;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("screenshots directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// One source screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub path: PathBuf,
    /// File name without extension.
    pub stem: String,
    /// Number extracted from the stem, if any.
    pub number: Option<u32>,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}

/// Discover screenshots directly inside `dir`.
pub fn discover_assets(dir: &Path) -> Result<Vec<Asset>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();
        if !entry.file_type().is_file() || is_hidden(&name) || !is_image(entry.path()) {
            continue;
        }
        let stem = entry
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        assets.push(Asset {
            path: entry.path().to_path_buf(),
            number: extract_screenshot_number(&stem),
            stem,
        });
    }

    tracing::debug!(dir = %dir.display(), count = assets.len(), "discovered screenshots");
    Ok(assets)
}
