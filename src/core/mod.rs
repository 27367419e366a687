//! Core processing logic for chatwrap.
//!
//! This module contains:
//! - [`filter`] - Date window over message timestamps
//! - [`tally`] - Insertion-ordered maps and counters
//! - [`text`] - Per-message feature extraction (media, questions, tags, emojis, words)
//! - [`stats`] - One-pass statistics aggregation
//! - [`contacts`] - Shared contact-card analysis
//! - [`report`] - Report model, banner and section assembly
//! - [`output`] - Format writers (text, JSON, CSV)

pub mod contacts;
pub mod filter;
pub mod output;
pub mod report;
pub mod stats;
pub mod tally;
pub mod text;

pub use contacts::{ContactShares, analyze_shared_contacts};
pub use filter::DateWindow;
pub use report::{Report, ReportBuilder};
pub use stats::Statistics;
pub use tally::{OrderedMap, Tally};
pub use text::StopWords;

pub use crate::Message;
