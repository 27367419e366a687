//! The structured message produced by the transcript scanner.
//!
//! A [`Message`] starts life when the scanner matches a header line, grows
//! while continuation lines arrive, and is finalized when the next header or
//! the end of input is reached. The enrichment flags (`deleted`, `media`,
//! `question`, `tags`, `emojis`) default to empty and are filled in by the
//! deletion classifier and the statistics pass.
//!
//! # Examples
//!
//! ```
//! use chatwrap::Message;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 0)
//!     .unwrap();
//! let msg = Message::new(Some("Alice".into()), ts, "Hello there");
//!
//! assert_eq!(msg.sender_name(), "Alice");
//! assert_eq!(msg.hour, 10);
//! assert_eq!(msg.weekday(), 2); // Tuesday
//! ```

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One chat message extracted from a transcript.
///
/// `year`, `month`, `day`, `hour` and `minute` mirror `timestamp`; they are
/// kept as plain fields so the structured dump carries them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Author as printed in the header, `None` for unattributed notices.
    pub sender: Option<String>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,

    /// Wall-clock time composed from the header fields.
    pub timestamp: NaiveDateTime,

    /// Body text; continuation lines are joined with `\n`.
    pub text: String,

    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub media: bool,
    #[serde(default)]
    pub question: bool,

    /// Distinct tags in first-seen order.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Emoji grapheme clusters concatenated in order of appearance.
    #[serde(default)]
    pub emojis: String,
}

impl Message {
    /// Creates a message from a sender, a timestamp and body text.
    pub fn new(sender: Option<String>, timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            sender,
            year: timestamp.year(),
            month: timestamp.month(),
            day: timestamp.day(),
            hour: timestamp.hour(),
            minute: timestamp.minute(),
            timestamp,
            text: text.into(),
            deleted: false,
            media: false,
            question: false,
            tags: Vec::new(),
            emojis: String::new(),
        }
    }

    /// Sender name, or an empty string for unattributed notices.
    pub fn sender_name(&self) -> &str {
        self.sender.as_deref().unwrap_or_default()
    }

    /// Day of the week, 0 = Sunday.
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_sunday()
    }

    /// Appends a continuation line to the body.
    pub fn push_line(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }

    /// Sets the deleted flag.
    #[must_use]
    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }
}
