//! Translation templates.
//!
//! A template maps translation keys to the source text they were made from:
//!
//! ```json
//! {
//!   "stay_on_course": "Stay on course",
//!   "track_your_habits": {
//!     "plainText": "Track your habits",
//!     "ranges": [{ "text": "Track", "fontStyle": "Bold" }]
//!   }
//! }
//! ```
//!
//! Keys come from [`sanitize_key`]. Entries written by design tools may carry
//! style ranges; they are preserved as-is and never interpreted here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Longest key [`sanitize_key`] produces.
pub const MAX_KEY_LEN: usize = 30;

const LANG_PREFIX: &str = "lang_";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid template: {0}")]
    Json(#[from] serde_json::Error),
}

/// Strip a trailing ` copy` or ` copy N` left by duplicated layers.
fn strip_copy_suffix(text: &str) -> &str {
    let trimmed = text.trim_end();
    let without_digits = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    let candidate = if without_digits.len() < trimmed.len() {
        match without_digits.strip_suffix(' ') {
            Some(rest) => rest,
            None => return trimmed,
        }
    } else {
        trimmed
    };
    candidate.strip_suffix(" copy").unwrap_or(trimmed)
}

/// Turn free text into a translation key.
///
/// Lowercases, drops any number of leading `lang_` prefixes and a trailing
/// ` copy N`, turns spaces into underscores and keeps only `[a-z0-9._-]`.
/// Keys longer than [`MAX_KEY_LEN`] are cut at the last underscore inside the
/// limit, or hard-cut when there is none.
///
/// ```
/// use screenshot_cropper::template::sanitize_key;
///
/// assert_eq!(sanitize_key("Track Your Habits!"), "track_your_habits");
/// assert_eq!(sanitize_key("lang_lang_Title copy 2"), "title");
/// ```
pub fn sanitize_key(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut rest = lower.as_str();
    while let Some(stripped) = rest.strip_prefix(LANG_PREFIX) {
        rest = stripped;
    }
    let rest = strip_copy_suffix(rest);

    let key: String = rest
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        .collect();

    if key.len() <= MAX_KEY_LEN {
        return key;
    }
    // Only ASCII remains, so byte slicing is safe
    let head = &key[..MAX_KEY_LEN];
    match head.rfind('_') {
        Some(cut) if cut > 0 => key[..cut].to_string(),
        _ => head.to_string(),
    }
}

/// One template value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateEntry {
    Plain(String),
    Rich {
        #[serde(rename = "plainText")]
        plain_text: String,
        #[serde(default)]
        ranges: Vec<serde_json::Value>,
    },
}

impl TemplateEntry {
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Rich { plain_text, .. } => plain_text,
        }
    }
}

/// Sorted key → entry map, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    entries: BTreeMap<String, TemplateEntry>,
}

impl Template {
    /// Load a template, or start empty when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TemplateError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add `text` under its sanitized key and return the key used.
    ///
    /// A key already holding different text gets `_2`, `_3`, ... appended;
    /// the same text reuses its key. Blank text is ignored.
    pub fn insert_text(&mut self, text: &str) -> Option<String> {
        self.insert_entry(TemplateEntry::Plain(text.to_string()))
    }

    pub fn insert_entry(&mut self, entry: TemplateEntry) -> Option<String> {
        let text = entry.plain_text();
        if text.trim().is_empty() {
            return None;
        }
        let base = sanitize_key(text);
        let mut key = base.clone();
        let mut counter = 2;
        while let Some(existing) = self.entries.get(&key) {
            if existing.plain_text() == text {
                break;
            }
            key = format!("{base}_{counter}");
            counter += 1;
        }
        tracing::debug!(%key, "template entry");
        self.entries.insert(key.clone(), entry);
        Some(key)
    }

    /// Insert every non-blank line of `source`; returns the keys in line order.
    pub fn extend_from_lines(&mut self, source: &str) -> Vec<String> {
        source
            .lines()
            .filter_map(|line| self.insert_text(line.trim()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&TemplateEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
