//! Locale texts.
//!
//! Each `{code}.json` file in the locales directory holds the captions for one
//! locale, either as an object keyed `Text_1`, `Text_2`, ... or as a plain
//! array of strings:
//!
//! ```json
//! { "Text_1": "Track your habits", "Text_2": "Stay on course" }
//! ```
//! ```json
//! ["Track your habits", "Stay on course"]
//! ```
//!
//! Texts are looked up by screenshot index through [`LocaleProvider`].

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid locale file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read locales directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Source of caption text per locale.
pub trait LocaleProvider: Sync {
    /// Locale codes, sorted.
    fn locales(&self) -> Vec<String>;

    /// Caption for `index` in `locale`.
    ///
    /// Keyed locales try `Text_{index + 1}` (or `Text_{index}` when `add_one`
    /// is false) and then the bare `"{index}"` key. Array locales index
    /// directly. Missing entries are `None`.
    fn get_text(&self, locale: &str, index: u32, add_one: bool) -> Option<String>;
}

/// Contents of one locale file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocaleTexts {
    Keyed(BTreeMap<String, String>),
    Indexed(Vec<String>),
}

impl LocaleTexts {
    pub fn len(&self) -> usize {
        match self {
            Self::Keyed(map) => map.len(),
            Self::Indexed(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, index: u32, add_one: bool) -> Option<&str> {
        match self {
            Self::Keyed(map) => {
                let key_index = if add_one { index.saturating_add(1) } else { index };
                map.get(&format!("Text_{key_index}"))
                    .or_else(|| map.get(&index.to_string()))
                    .map(String::as_str)
            }
            Self::Indexed(list) => list.get(index as usize).map(String::as_str),
        }
    }
}

/// Locales loaded from a directory of JSON files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonLocales {
    locales: BTreeMap<String, LocaleTexts>,
}

/// Parse a single locale file.
pub fn load_locale_file(path: &Path) -> Result<LocaleTexts, LocaleError> {
    let content = fs::read_to_string(path).map_err(|source| LocaleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LocaleError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl JsonLocales {
    /// Load every `*.json` file in `dir`, optionally keeping only
    /// `language_filter`.
    ///
    /// A missing directory yields no locales. A file that fails to parse is
    /// logged and skipped.
    pub fn load(dir: &Path, language_filter: Option<&str>) -> Result<Self, LocaleError> {
        let mut locales = BTreeMap::new();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "locales directory not found");
            return Ok(Self { locales });
        }

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_json = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if !entry.file_type().is_file() || !is_json {
                continue;
            }
            let Some(code) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if code.starts_with('.') || language_filter.is_some_and(|f| f != code) {
                continue;
            }
            match load_locale_file(path) {
                Ok(texts) => {
                    tracing::info!(locale = %code, texts = texts.len(), "loaded locale");
                    locales.insert(code, texts);
                }
                Err(e) => tracing::error!(error = %e, "failed to load locale file"),
            }
        }

        if let Some(filter) = language_filter.filter(|f| !locales.contains_key(*f)) {
            tracing::warn!(locale = filter, "requested language has no locale file");
        }
        Ok(Self { locales })
    }

    pub fn from_texts(texts: impl IntoIterator<Item = (String, LocaleTexts)>) -> Self {
        Self {
            locales: texts.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl LocaleProvider for JsonLocales {
    fn locales(&self) -> Vec<String> {
        self.locales.keys().cloned().collect()
    }

    fn get_text(&self, locale: &str, index: u32, add_one: bool) -> Option<String> {
        let Some(texts) = self.locales.get(locale) else {
            tracing::warn!(locale, "locale not found");
            return None;
        };
        let text = texts.lookup(index, add_one);
        if text.is_none() {
            tracing::warn!(locale, index, "no text for screenshot");
        }
        text.map(str::to_string)
    }
}
