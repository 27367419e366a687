//! # Chatwrap
//!
//! A Rust library that turns WhatsApp chat exports into a yearly
//! "wrapped" report.
//!
//! ## Overview
//!
//! Chatwrap reads an export (a bare `.txt` transcript or the `.zip` bundle
//! WhatsApp produces with its attachments) and computes:
//! - **who** talks the most, shares the most media, asks the most questions
//!   and tags whom;
//! - **when** the group is active, by hour, weekday and month;
//! - **what** is said: top words, uncommon words and emojis;
//! - **which contacts** were shared, joined against the `.vcf` attachments.
//!
//! Four timestamp dialects are detected automatically, and join, leave and
//! pin notices are recognized in several languages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatwrap::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = WrappedConfig::new().with_date_range("2025-01-01", "2025-12-31")?;
//!     let parser = TranscriptParser::with_config(config.clone());
//!     let (source, mut chat) = parser.parse("WhatsApp Chat with Family.zip".as_ref())?;
//!
//!     let stats = Statistics::aggregate(&mut chat.messages, &StopWords::english());
//!     let contacts = analyze_shared_contacts(&source.contact_cards(), &chat.messages);
//!
//!     let locale = Locale::english();
//!     let report = ReportBuilder::new(&stats, &config, &locale)
//!         .with_group_name(source.group_name())
//!         .with_membership(chat.joined.len(), chat.left.len(), chat.pinned)
//!         .with_contacts(&contacts)
//!         .build();
//!
//!     print!("{}", render_report(&report, ReportFormat::Text)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`TranscriptParser`](parser::TranscriptParser), the full text-to-messages pipeline
//! - [`parsing`] - the pipeline stages
//!   - [`parsing::dialect`] - timestamp dialect detection and header parsing
//!   - [`parsing::scanner`] - line accumulation into messages
//!   - [`parsing::system`] - join / leave / pin / system notice classification
//!   - [`parsing::deletion`] - deleted-message sentinels
//! - [`source`] - loading `.txt` / `.zip` exports
//! - [`archive`] - minimal ZIP local-entry reader
//! - [`core`] - statistics, contacts, report model and writers
//! - [`config`] - [`WrappedConfig`](config::WrappedConfig), TOML-loadable run settings
//! - [`locale`] - localized report strings
//! - [`format`] - [`ReportFormat`](format::ReportFormat) and report rendering
//! - [`cli`] - CLI types (feature `cli`)
//! - [`error`] - Unified error types ([`ChatwrapError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod locale;
pub mod message;
pub mod parser;
pub mod parsing;
pub mod source;

// Re-export the main types at the crate root for convenience
pub use error::{ChatwrapError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatwrap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;

    pub use crate::error::{ChatwrapError, Result};

    pub use crate::config::WrappedConfig;
    pub use crate::locale::Locale;

    pub use crate::parser::{ParsedChat, TranscriptParser, parse_transcript};
    pub use crate::parsing::{DeletionKind, Dialect, Disposition, SystemEvent};
    pub use crate::source::ChatSource;

    pub use crate::core::contacts::{ContactShares, analyze_shared_contacts};
    pub use crate::core::filter::DateWindow;
    pub use crate::core::report::{Report, ReportBuilder};
    pub use crate::core::stats::Statistics;
    pub use crate::core::text::StopWords;

    pub use crate::format::{ReportFormat, render_report};
}
