//! Transcript parsing pipeline.
//!
//! [`TranscriptParser`] runs the full path from raw export text to the
//! retained messages:
//!
//! 1. normalize direction marks and non-breaking spaces,
//! 2. detect the timestamp [`Dialect`],
//! 3. scan lines into messages,
//! 4. drop messages outside the configured date window,
//! 5. classify system notices (joins, leaves, pins, other).
//!
//! Every scanned message ends up in exactly one bucket of [`ParsedChat`].
//!
//! # Example
//!
//! ```rust
//! use chatwrap::parser::TranscriptParser;
//!
//! let chat = TranscriptParser::new().parse_str(
//!     "1/2/24, 10:00 - Alice: Hello\n1/2/24, 10:05 - Alice added Bob\n1/2/24, 10:06 - Bob: hi",
//! );
//! assert_eq!(chat.messages.len(), 2);
//! assert_eq!(chat.joined.count("Bob"), 1);
//! ```

use std::path::Path;

use crate::config::WrappedConfig;
use crate::core::tally::Tally;
use crate::error::Result;
use crate::message::Message;
use crate::parsing::deletion::is_deleted;
use crate::parsing::dialect::{Dialect, detect_dialect};
use crate::parsing::scanner::MessageScanner;
use crate::parsing::system::{Disposition, classify};
use crate::source::{ChatSource, normalize_transcript};

/// Result of parsing one transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedChat {
    pub dialect: Dialect,
    /// Ordinary messages inside the window, in transcript order.
    pub messages: Vec<Message>,
    /// Member name to number of join notices.
    pub joined: Tally<String>,
    /// Member name to number of leave or removal notices.
    pub left: Tally<String>,
    /// Pinned-message notices.
    pub pinned: u64,
    /// Other system notices.
    pub dropped: usize,
    pub outside_window: usize,
    /// Lines that preceded the first message header.
    pub unparsable: usize,
}

impl ParsedChat {
    /// Every message the scanner produced, whatever its bucket.
    pub fn scanned(&self) -> usize {
        self.messages.len()
            + self.joined.total() as usize
            + self.left.total() as usize
            + self.pinned as usize
            + self.dropped
            + self.outside_window
    }
}

/// Parser for chat transcripts.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    config: WrappedConfig,
}

impl TranscriptParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WrappedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WrappedConfig {
        &self.config
    }

    /// Loads `path` (a `.txt` transcript or `.zip` export) and parses it.
    ///
    /// The returned [`ChatSource`] still holds the archive, for contact
    /// cards and the group name.
    pub fn parse(&self, path: &Path) -> Result<(ChatSource, ParsedChat)> {
        let source = ChatSource::load(path)?;
        let chat = self.parse_str(&source.text);
        Ok((source, chat))
    }

    /// Parses transcript text. Never fails; unusable lines are counted.
    pub fn parse_str(&self, text: &str) -> ParsedChat {
        let text = normalize_transcript(text);
        let dialect = detect_dialect(&text);
        let scanned = MessageScanner::new(dialect, &self.config.tag_to_name).scan(&text);

        let window = self.config.window();
        let mut chat = ParsedChat {
            dialect,
            unparsable: scanned.unparsable,
            ..ParsedChat::default()
        };

        for message in scanned.messages {
            if !window.contains(message.timestamp) {
                chat.outside_window += 1;
                continue;
            }
            match classify(&message) {
                Disposition::Keep => {
                    let deleted = is_deleted(&message.text);
                    chat.messages.push(message.with_deleted(deleted));
                }
                Disposition::Joined(member) => chat.joined.increment(member.as_str()),
                Disposition::Left(member) => chat.left.increment(member.as_str()),
                Disposition::Pinned => chat.pinned += 1,
                Disposition::Dropped => chat.dropped += 1,
            }
        }

        tracing::debug!(
            %dialect,
            kept = chat.messages.len(),
            joined = chat.joined.len(),
            left = chat.left.len(),
            pinned = chat.pinned,
            dropped = chat.dropped,
            outside_window = chat.outside_window,
            unparsable = chat.unparsable,
            "parsed transcript"
        );
        chat
    }
}

/// Parses `text` with `config`.
pub fn parse_transcript(text: &str, config: &WrappedConfig) -> ParsedChat {
    TranscriptParser::with_config(config.clone()).parse_str(text)
}
