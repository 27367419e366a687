//! Output format writers.
//!
//! This module provides writers for the report and for the retained messages:
//! - [`render_text`] / [`write_text`] - the plain-text report (banner + sections)
//! - [`report_to_json`] - the JSON report document
//! - [`write_json`] / [`to_json`] - JSON array of messages
//! - [`write_texts_json`] / [`to_texts_json`] - JSON array of message bodies
//! - [`write_csv`] / [`to_csv`] - CSV of messages - requires `csv-output` feature
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatwrap::Result<()> {
//! use chatwrap::core::output::{to_json, write_json};
//! use chatwrap::parser::TranscriptParser;
//!
//! let chat = TranscriptParser::new().parse_str("1/2/24, 10:00 - Alice: Hello!");
//! write_json(&chat.messages, "messages.json".as_ref())?;
//! let json = to_json(&chat.messages)?;
//! # let _ = json;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "csv-output")]
pub mod csv_writer;
pub mod json_writer;
pub mod text_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{report_to_json, to_json, to_texts_json, write_json, write_texts_json};
pub use text_writer::{render_text, write_text};
