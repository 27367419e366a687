//! Localized report strings.
//!
//! A [`Locale`] wraps a nested JSON table and resolves dotted paths such as
//! `sections.topSenders`. A missing key resolves to the path itself and is
//! logged once per lookup, so a partial translation still yields a readable
//! report.
//!
//! ```rust
//! use chatwrap::locale::Locale;
//!
//! let en = Locale::english();
//! assert_eq!(en.t("sections.topSenders"), "Top senders");
//! assert_eq!(en.pluralize(2, "messageWithMedia"), "messages with media");
//! assert_eq!(en.pluralize(1, "question"), "question");
//! assert_eq!(en.t("no.such.key"), "no.such.key");
//!
//! let he = Locale::builtin("he").unwrap();
//! assert!(he.is_rtl());
//! ```

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{ChatwrapError, Result};

const BUILTIN_EN: &str = include_str!("../locales/en.json");

/// Language code and JSON table of every built-in translation.
static BUILTIN: [(&str, &str); 4] = [
    ("en", BUILTIN_EN),
    ("he", include_str!("../locales/he.json")),
    ("it", include_str!("../locales/it.json")),
    ("ja", include_str!("../locales/ja.json")),
];

/// A loaded string table.
#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    table: Value,
    code: String,
    name: String,
    rtl: bool,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    /// The built-in English table.
    pub fn english() -> Self {
        Self::from_json_str(BUILTIN_EN).unwrap_or_else(|_| Self {
            table: Value::Object(serde_json::Map::new()),
            code: "en".into(),
            name: "English".into(),
            rtl: false,
        })
    }

    /// A built-in translation by language code, e.g. `he`.
    pub fn builtin(code: &str) -> Option<Self> {
        let (_, source) = BUILTIN.iter().find(|(c, _)| c.eq_ignore_ascii_case(code))?;
        Self::from_json_str(source).ok()
    }

    /// Codes of the built-in translations.
    pub fn available() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(code, _)| *code)
    }

    /// The built-in translation for `code`, or English with a warning when
    /// there is none.
    pub fn for_language(code: &str) -> Self {
        Self::builtin(code).unwrap_or_else(|| {
            tracing::warn!(language = code, "no built-in translation, falling back to English");
            Self::english()
        })
    }

    /// Parses a JSON table. The top level must be an object.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let table: Value = serde_json::from_str(source)?;
        if !table.is_object() {
            return Err(ChatwrapError::locale("top level must be a JSON object"));
        }
        let code = table
            .get("code")
            .and_then(Value::as_str)
            .ok_or_else(|| ChatwrapError::locale("missing string field 'code'"))?
            .to_string();
        let name = table
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&code)
            .to_string();
        let rtl = table.get("rtl").and_then(Value::as_bool).unwrap_or(false);
        Ok(Self {
            table,
            code,
            name,
            rtl,
        })
    }

    /// Loads a JSON table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| ChatwrapError::locale(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&source)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    /// Resolves a dotted path to a string, if present.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        path.split('.')
            .try_fold(&self.table, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
            .and_then(Value::as_str)
    }

    /// Resolves a dotted path, falling back to the path itself.
    pub fn t(&self, path: &str) -> String {
        match self.lookup(path) {
            Some(s) => s.to_string(),
            None => {
                tracing::warn!(locale = %self.code, key = path, "missing translation key");
                path.to_string()
            }
        }
    }

    /// Replaces `{name}` placeholders in `template`.
    pub fn format(template: &str, params: &[(&str, &str)]) -> String {
        params.iter().fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{key}}}"), value)
        })
    }

    /// Translates `path` and fills its placeholders.
    pub fn t_with(&self, path: &str, params: &[(&str, &str)]) -> String {
        Self::format(&self.t(path), params)
    }

    /// Unit label for `count`: the singular for one, otherwise the
    /// `unitPlurals` override or the singular plus `pluralSuffix`
    /// (default `s`).
    pub fn pluralize(&self, count: u64, unit_key: &str) -> String {
        let singular = self.t(&format!("units.{unit_key}"));
        if count == 1 {
            return singular;
        }
        if let Some(plural) = self.lookup(&format!("unitPlurals.{unit_key}")) {
            return plural.to_string();
        }
        let suffix = self.lookup("pluralSuffix").unwrap_or("s");
        format!("{singular}{suffix}")
    }

    /// Action verb agreeing with `count`.
    ///
    /// Tables for languages with verb agreement can provide
    /// `actionPlurals.<key>`; otherwise the verb is returned unchanged.
    pub fn conjugate_verb(&self, count: u64, action_key: &str) -> String {
        if count != 1 {
            if let Some(plural) = self.lookup(&format!("actionPlurals.{action_key}")) {
                return plural.to_string();
            }
        }
        self.t(&format!("actions.{action_key}"))
    }

    /// Weekday name, 0 = Sunday.
    pub fn day_name(&self, day: u32) -> String {
        self.lookup(&format!("days.{day}"))
            .map_or_else(|| format!("Day {day}"), str::to_string)
    }

    /// Month name, 1 = January.
    pub fn month_name(&self, month: u32) -> String {
        month
            .checked_sub(1)
            .and_then(|i| self.lookup(&format!("months.{i}")))
            .map_or_else(|| format!("Month {month}"), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_english_parses() {
        let en = Locale::from_json_str(BUILTIN_EN).unwrap();
        assert_eq!(en.code(), "en");
        assert_eq!(en.name(), "English");
        assert!(!en.is_rtl());
    }

    #[test]
    fn test_lookup_nested() {
        let en = Locale::english();
        assert_eq!(en.lookup("stats.totalWordsent"), Some("Total words sent"));
        assert_eq!(en.lookup("stats"), None);
        assert_eq!(en.lookup("stats.totalWordsent.deeper"), None);
    }

    #[test]
    fn test_missing_key_falls_back_to_path() {
        let en = Locale::english();
        assert_eq!(en.t("sections.nope"), "sections.nope");
    }

    #[test]
    fn test_format_placeholders() {
        assert_eq!(Locale::format("{hour}:00", &[("hour", "7")]), "7:00");
        assert_eq!(Locale::english().t_with("formats.hourFormat", &[("hour", "21")]), "21:00");
    }

    #[test]
    fn test_pluralize() {
        let en = Locale::english();
        assert_eq!(en.pluralize(1, "message"), "message");
        assert_eq!(en.pluralize(0, "message"), "messages");
        assert_eq!(en.pluralize(5, "time"), "times");
        assert_eq!(en.pluralize(5, "messageWithMedia"), "messages with media");
    }

    #[test]
    fn test_conjugate_verb() {
        let en = Locale::english();
        assert_eq!(en.conjugate_verb(3, "shared"), "shared");

        let he = Locale::from_json_str(
            r#"{"code":"he","rtl":true,"actions":{"shared":"שיתף"},"actionPlurals":{"shared":"שיתפו"}}"#,
        )
        .unwrap();
        assert_eq!(he.conjugate_verb(1, "shared"), "שיתף");
        assert_eq!(he.conjugate_verb(2, "shared"), "שיתפו");
        assert!(he.is_rtl());
        assert_eq!(he.name(), "he");
    }

    #[test]
    fn test_day_and_month_names() {
        let en = Locale::english();
        assert_eq!(en.day_name(0), "Sunday");
        assert_eq!(en.day_name(6), "Saturday");
        assert_eq!(en.day_name(9), "Day 9");
        assert_eq!(en.month_name(1), "January");
        assert_eq!(en.month_name(12), "December");
        assert_eq!(en.month_name(0), "Month 0");
    }

    #[test]
    fn test_builtin_tables_parse() {
        for code in Locale::available() {
            let locale = Locale::builtin(code).unwrap();
            assert_eq!(locale.code(), code);
            assert!(locale.lookup("sections.topSenders").is_some(), "{code}");
            assert!(locale.lookup("titles.wrappedRange").is_some(), "{code}");
        }
        assert!(Locale::builtin("HE").is_some());
        assert!(Locale::builtin("xx").is_none());
    }

    #[test]
    fn test_hebrew_builtin() {
        let he = Locale::builtin("he").unwrap();
        assert!(he.is_rtl());
        assert_eq!(he.name(), "עברית");
        assert_ne!(he.conjugate_verb(1, "asked"), he.conjugate_verb(2, "asked"));
        assert_eq!(he.conjugate_verb(2, "asked"), "נשאלו");
        assert_eq!(he.pluralize(1, "message"), "הודעה");
        assert_eq!(he.pluralize(3, "message"), "הודעות");
        assert_eq!(he.pluralize(3, "emoji"), "אימוג'י");
        assert_eq!(he.day_name(6), "שבת");
    }

    #[test]
    fn test_languages_without_plural_suffix() {
        let ja = Locale::builtin("ja").unwrap();
        assert_eq!(ja.pluralize(5, "message"), "メッセージ");
        assert_eq!(ja.month_name(12), "12月");

        let it = Locale::builtin("it").unwrap();
        assert_eq!(it.pluralize(2, "time"), "volte");
        assert_eq!(it.pluralize(1, "time"), "volta");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        assert_eq!(Locale::for_language("xx").code(), "en");
        assert_eq!(Locale::for_language("it").code(), "it");
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(Locale::from_json_str("[1,2]").is_err());
        assert!(Locale::from_json_str(r#"{"name":"x"}"#).is_err());
    }
}
