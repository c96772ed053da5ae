//! Project layout and asset lookup.
//!
//! A project is addressed either by its directory (`--directory`) or by its
//! config file (`--config`). Both resolve to a [`ProjectPaths`], which also
//! yields the [`AssetRoots`] used to find backgrounds, overlays and fonts.

use crate::config::{self, ConfigError, DirectoriesConfig};
use std::path::{Path, PathBuf};

const INPUT_DIR: &str = "input";
const SCREENSHOTS_DIR: &str = "screenshots";
const LOCALES_DIR: &str = "locales";
const OUTPUT_DIR: &str = "output";
const FONTS_DIR: &str = "fonts";

/// Where referenced asset files are searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
    pub asset_root: PathBuf,
    pub base_dir: PathBuf,
}

impl AssetRoots {
    pub fn new(asset_root: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Locate a background or overlay file: absolute path, then the asset
    /// root, then the project base directory.
    pub fn resolve(&self, file: &str) -> Option<PathBuf> {
        let path = Path::new(file);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        [self.asset_root.join(path), self.base_dir.join(path)]
            .into_iter()
            .find(|p| p.is_file())
    }

    /// Locate a font file: absolute path, then `fonts/` under the base
    /// directory and the asset root, then the base directory itself.
    pub fn resolve_font(&self, file: &str) -> Option<PathBuf> {
        let path = Path::new(file);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        [
            self.base_dir.join(FONTS_DIR).join(path),
            self.asset_root.join(FONTS_DIR).join(path),
            self.base_dir.join(path),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }
}

/// Every location a batch run reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub config_file: PathBuf,
    pub screenshots: PathBuf,
    /// `None` when no locales directory is configured.
    pub locales: Option<PathBuf>,
    pub output: PathBuf,
    pub asset_root: PathBuf,
    pub base_dir: PathBuf,
}

impl ProjectPaths {
    /// Conventional layout under a project directory.
    pub fn from_directory(dir: &Path) -> Result<Self, ConfigError> {
        if !dir.is_dir() {
            return Err(ConfigError::NotFound(dir.to_path_buf()));
        }
        let config_file = config::find_config_file(dir)
            .ok_or_else(|| ConfigError::NotFound(dir.join(config::CONFIG_FILE_NAMES[0])))?;
        let input = dir.join(INPUT_DIR);
        Ok(Self {
            config_file,
            screenshots: input.join(SCREENSHOTS_DIR),
            locales: Some(input.join(LOCALES_DIR)),
            output: dir.join(OUTPUT_DIR),
            asset_root: input,
            base_dir: dir.to_path_buf(),
        })
    }

    /// Layout taken from the config's `directories` section.
    ///
    /// Relative entries resolve against the config file's directory.
    /// `screenshots` and `output` are required.
    pub fn from_config_file(
        config_file: &Path,
        dirs: &DirectoriesConfig,
    ) -> Result<Self, ConfigError> {
        let base_dir = config_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let resolve = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| base_dir.join(v))
        };

        let screenshots = resolve(&dirs.screenshots).ok_or_else(|| {
            ConfigError::Validation("configuration must specify directories.screenshots".into())
        })?;
        let output = resolve(&dirs.output).ok_or_else(|| {
            ConfigError::Validation("configuration must specify directories.output".into())
        })?;
        let asset_root = resolve(&dirs.assets).unwrap_or_else(|| {
            screenshots
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base_dir.clone())
        });

        Ok(Self {
            config_file: config_file.to_path_buf(),
            screenshots,
            locales: resolve(&dirs.locales),
            output,
            asset_root,
            base_dir,
        })
    }

    pub fn asset_roots(&self) -> AssetRoots {
        AssetRoots::new(&self.asset_root, &self.base_dir)
    }

    /// Directory for `keep_cropped` copies.
    pub fn cropped_dir(&self) -> PathBuf {
        self.output.join("cropped")
    }
}
