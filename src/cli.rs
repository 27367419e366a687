//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Report format flag, convertible to
//!   [`ReportFormat`](crate::format::ReportFormat)
//!
//! Flags override values loaded from `--config`:
//!
//! ```rust
//! use clap::Parser;
//! use chatwrap::cli::Args;
//!
//! let args = Args::parse_from(["chatwrap", "chat.zip", "--top", "3", "--start", "2025-01-01"]);
//! let config = args.to_config()?;
//! assert_eq!(config.top_count, 3);
//! assert!(config.start_date.is_some());
//! # Ok::<(), chatwrap::ChatwrapError>(())
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::WrappedConfig;
use crate::core::filter::parse_date;
use crate::error::Result;

/// Turn a WhatsApp chat export into a "wrapped" report of who talked the
/// most, about what, and when.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatwrap")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatwrap \"WhatsApp Chat with Family.zip\"
    chatwrap chat.txt --start 2025-01-01 --end 2025-12-31
    chatwrap chat.zip --format json --top 10
    chatwrap chat.zip --language he
    chatwrap chat.zip --config wrapped.toml --output-dir out/")]
pub struct Args {
    /// Path to the exported chat (.txt or .zip)
    pub input: PathBuf,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,

    /// Length of every Top-N list
    #[arg(short, long, value_name = "N")]
    pub top: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Built-in report language (en, he, it, ja)
    #[arg(long, value_name = "CODE")]
    pub language: Option<String>,

    /// Custom JSON locale table, overrides --language
    #[arg(short, long, value_name = "FILE")]
    pub locale: Option<PathBuf>,

    /// Stop-word file, one word per line (repeatable)
    #[arg(long = "stop-words", value_name = "FILE")]
    pub stop_words: Vec<PathBuf>,

    /// Also write results.txt, messages.json, messages.csv and
    /// messages-text.json into this directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Args {
    /// Loads `--config` (if any) and applies the flag overrides.
    pub fn to_config(&self) -> Result<WrappedConfig> {
        let mut config = match &self.config {
            Some(path) => WrappedConfig::load(path)?,
            None => WrappedConfig::default(),
        };
        if let Some(start) = &self.start {
            config.start_date = Some(parse_date(start)?);
        }
        if let Some(end) = &self.end {
            config.end_date = Some(parse_date(end)?);
        }
        if let Some(top) = self.top {
            config.top_count = top;
        }
        if let Some(language) = &self.language {
            config.language = Some(language.clone());
        }
        if let Some(locale) = &self.locale {
            config.locale = Some(locale.clone());
        }
        if !self.stop_words.is_empty() {
            config.stop_words.clone_from(&self.stop_words);
        }
        config.validate(self.config.as_deref())
    }
}

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Banner and titled sections
    #[default]
    #[value(alias = "txt")]
    Text,

    /// `{metadata, sections}` document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "Text"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::ReportFormat {
    fn from(format: OutputFormat) -> crate::format::ReportFormat {
        match format {
            OutputFormat::Text => crate::format::ReportFormat::Text,
            OutputFormat::Json => crate::format::ReportFormat::Json,
        }
    }
}
