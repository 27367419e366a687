//! Run configuration.
//!
//! [`WrappedConfig`] carries the analysis window, the ranking depth, the
//! phone-tag to display-name table and optional locale / stop-word files.
//! It can be built in code with the `with_*` methods or loaded from TOML:
//!
//! ```toml
//! start_date = "2025-01-01"
//! end_date = "2025-12-31"
//! top_count = 6
//! language = "he"
//! stop_words = ["common-words-he.txt"]
//!
//! [tag_to_name]
//! "@15551234567" = "Dana"
//! ```
//!
//! # Example
//!
//! ```rust
//! use chatwrap::config::WrappedConfig;
//!
//! let config = WrappedConfig::from_toml_str(r#"
//!     start_date = "2025-01-01"
//!     top_count = 3
//! "#)?;
//!
//! assert_eq!(config.top_count, 3);
//! assert!(config.end_date.is_none());
//! # Ok::<(), chatwrap::ChatwrapError>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::filter::{DateWindow, parse_date};
use crate::error::{ChatwrapError, Result};
use crate::locale::Locale;

/// Default number of entries in every ranked section.
pub const DEFAULT_TOP_COUNT: usize = 6;

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrappedConfig {
    /// First day of the window (inclusive), open when absent.
    pub start_date: Option<NaiveDate>,

    /// Last day of the window (inclusive), open when absent.
    pub end_date: Option<NaiveDate>,

    /// Length limit for every Top-N list (default: 6)
    pub top_count: usize,

    /// `@<digits>` tag to display name.
    pub tag_to_name: BTreeMap<String, String>,

    /// Built-in translation to use (`en`, `he`, `it`, `ja`).
    pub language: Option<String>,

    /// JSON locale table. Takes precedence over `language`.
    pub locale: Option<PathBuf>,

    /// Stop-word files, one word per line. The built-in English list is
    /// used when empty.
    pub stop_words: Vec<PathBuf>,
}

impl Default for WrappedConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            top_count: DEFAULT_TOP_COUNT,
            tag_to_name: BTreeMap::new(),
            language: None,
            locale: None,
            stop_words: Vec::new(),
        }
    }
}

impl WrappedConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ChatwrapError::config(None, e.to_string()))?;
        config.validate(None)
    }

    /// Loads a TOML file.
    ///
    /// Relative locale and stop-word paths are resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| ChatwrapError::config(Some(path.to_path_buf()), e.to_string()))?;
        let mut config: Self = toml::from_str(&source)
            .map_err(|e| ChatwrapError::config(Some(path.to_path_buf()), e.to_string()))?;

        if let Some(dir) = path.parent() {
            config.locale = config.locale.map(|p| dir.join(p));
            config.stop_words = config.stop_words.into_iter().map(|p| dir.join(p)).collect();
        }
        config.validate(Some(path))
    }

    /// Checks that the window is ordered and `top_count` is positive.
    /// `path` names the file the values came from, for error messages.
    pub fn validate(self, path: Option<&Path>) -> Result<Self> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ChatwrapError::config(
                    path.map(Path::to_path_buf),
                    format!("start_date {start} is after end_date {end}"),
                ));
            }
        }
        if self.top_count == 0 {
            return Err(ChatwrapError::config(
                path.map(Path::to_path_buf),
                "top_count must be at least 1",
            ));
        }
        Ok(self)
    }

    /// Sets the first day of the window.
    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the last day of the window.
    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the window from `YYYY-MM-DD` strings.
    pub fn with_date_range(mut self, start: &str, end: &str) -> Result<Self> {
        self.start_date = Some(parse_date(start)?);
        self.end_date = Some(parse_date(end)?);
        self.validate(None)
    }

    /// Sets the Top-N length.
    #[must_use]
    pub fn with_top_count(mut self, top_count: usize) -> Self {
        self.top_count = top_count;
        self
    }

    /// Maps a phone tag such as `@15551234567` to a display name.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>, name: impl Into<String>) -> Self {
        self.tag_to_name.insert(tag.into(), name.into());
        self
    }

    /// Uses a built-in translation.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    /// Uses a JSON locale table.
    #[must_use]
    pub fn with_locale(mut self, path: impl Into<PathBuf>) -> Self {
        self.locale = Some(path.into());
        self
    }

    /// Adds a stop-word file.
    #[must_use]
    pub fn with_stop_words(mut self, path: impl Into<PathBuf>) -> Self {
        self.stop_words.push(path.into());
        self
    }

    /// The report strings: the `locale` file if set, else the built-in
    /// `language`, else English.
    pub fn load_locale(&self) -> Result<Locale> {
        match (&self.locale, &self.language) {
            (Some(path), _) => Locale::load(path),
            (None, Some(code)) => Ok(Locale::for_language(code)),
            (None, None) => Ok(Locale::english()),
        }
    }

    /// The configured window as timestamps.
    pub fn window(&self) -> DateWindow {
        DateWindow::from_dates(self.start_date, self.end_date)
    }

    /// Display name for a tag, falling back to the tag itself.
    pub fn display_name<'a>(&'a self, tag: &'a str) -> &'a str {
        self.tag_to_name.get(tag).map_or(tag, String::as_str)
    }
}
