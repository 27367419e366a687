//! Report format types for the chatwrap library.
//!
//! These types don't depend on CLI frameworks, so library users can pick a
//! rendering without pulling in clap.
//!
//! # Example
//!
//! ```rust
//! use chatwrap::format::{ReportFormat, render_report};
//! use chatwrap::config::WrappedConfig;
//! use chatwrap::core::{ReportBuilder, Statistics};
//! use chatwrap::locale::Locale;
//!
//! let stats = Statistics::default();
//! let config = WrappedConfig::default();
//! let locale = Locale::english();
//! let report = ReportBuilder::new(&stats, &config, &locale).build();
//!
//! let json = render_report(&report, ReportFormat::Json)?;
//! assert!(json.starts_with('{'));
//! # Ok::<(), chatwrap::ChatwrapError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::output::{render_text, report_to_json};
use crate::core::report::Report;
use crate::error::Result;

/// How the report is rendered.
///
/// - [`Text`](ReportFormat::Text) - banner plus titled sections, for terminals
/// - [`Json`](ReportFormat::Json) - `{metadata, sections}` document, for front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// ```rust
    /// use chatwrap::format::ReportFormat;
    ///
    /// assert_eq!(ReportFormat::Text.extension(), "txt");
    /// assert_eq!(ReportFormat::Json.extension(), "json");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["text", "txt", "json"]
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text/plain",
            ReportFormat::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "Text"),
            ReportFormat::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                ReportFormat::all_names().join(", ")
            )),
        }
    }
}

/// Renders `report` as a string in `format`.
pub fn render_report(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => report_to_json(report),
    }
}

/// Writes `report` to `path` in `format`.
pub fn write_report(report: &Report, path: &Path, format: ReportFormat) -> Result<()> {
    std::fs::write(path, render_report(report, format)?)?;
    Ok(())
}
