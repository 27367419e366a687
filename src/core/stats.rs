//! One-pass statistics over the retained messages.
//!
//! [`Statistics::aggregate`] computes each message's media, question, tag
//! and emoji features, writes them back onto the message and folds them
//! into insertion-ordered tallies. Every sender appears in every per-sender
//! tally, with zero counts included, in the order senders first spoke.
//!
//! # Example
//!
//! ```
//! use chatwrap::core::stats::Statistics;
//! use chatwrap::core::text::StopWords;
//! use chatwrap::parser::parse_transcript;
//! use chatwrap::config::WrappedConfig;
//!
//! let chat = parse_transcript(
//!     "1/2/24, 10:00 - Alice: Hello there\n1/2/24, 10:01 - Bob: Hi Alice!",
//!     &WrappedConfig::default(),
//! );
//! let mut messages = chat.messages;
//! let stats = Statistics::aggregate(&mut messages, &StopWords::english());
//!
//! assert_eq!(stats.total_messages, 2);
//! assert_eq!(stats.sender_messages.count("Alice"), 1);
//! assert_eq!(stats.hours.count(&10), 2);
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::filter::DateWindow;
use crate::core::tally::{OrderedMap, Tally};
use crate::core::text::{
    StopWords, clean_word, emoji_clusters, extract_tags, is_media, is_question,
    strip_edited_markers,
};
use crate::message::Message;
use crate::parsing::deletion::{DeletionKind, deletion_kind};

/// Aggregated counters for one transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_messages: u64,
    pub media_messages: u64,
    /// Deleted by the author or by an admin.
    pub deleted_messages: u64,
    pub deleted_by_admin: u64,
    pub question_messages: u64,

    /// Raw whitespace tokens over messages that contributed words.
    pub total_words: u64,
    pub messages_with_words: u64,

    pub sender_messages: Tally<String>,
    pub sender_media: Tally<String>,
    pub sender_questions: Tally<String>,
    pub sender_tags: Tally<String>,
    /// Tag to number of messages mentioning it.
    pub taggees: Tally<String>,
    /// Concatenated emoji clusters per sender.
    pub sender_emojis: OrderedMap<String, String>,
    pub emojis: Tally<String>,
    pub words: Tally<String>,
    pub uncommon_words: Tally<String>,

    pub hours: Tally<u32>,
    /// 0 = Sunday.
    pub weekdays: Tally<u32>,
    /// 1 = January.
    pub months: Tally<u32>,

    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Statistics {
    /// Enriches `messages` in place and tallies them.
    pub fn aggregate(messages: &mut [Message], stop_words: &StopWords) -> Self {
        let mut stats = Self::default();
        for message in messages.iter_mut() {
            stats.add_message(message, stop_words);
        }
        tracing::debug!(
            messages = stats.total_messages,
            senders = stats.sender_messages.len(),
            words = stats.total_words,
            "aggregated statistics"
        );
        stats
    }

    fn add_message(&mut self, message: &mut Message, stop_words: &StopWords) {
        let kind = deletion_kind(&message.text);
        message.deleted = kind.is_some();
        message.media = is_media(&message.text);
        message.question = is_question(&message.text);
        message.tags = extract_tags(&message.text);
        let clusters: Vec<&str> = emoji_clusters(&message.text).collect();
        message.emojis = clusters.concat();

        let sender = message.sender_name();
        self.total_messages += 1;
        self.sender_messages.increment(sender);
        self.sender_media.touch(sender);
        self.sender_questions.touch(sender);
        self.sender_tags.add(sender, message.tags.len() as u64);
        self.sender_emojis.get_or_default(sender).push_str(&message.emojis);

        if message.deleted {
            self.deleted_messages += 1;
        }
        if kind == Some(DeletionKind::ByAdmin) {
            self.deleted_by_admin += 1;
        }
        if message.media {
            self.media_messages += 1;
            self.sender_media.increment(sender);
        }
        if message.question {
            self.question_messages += 1;
            self.sender_questions.increment(sender);
        }
        for tag in &message.tags {
            self.taggees.increment(tag.as_str());
        }
        for cluster in clusters {
            self.emojis.increment(cluster);
        }

        self.hours.increment(&message.hour);
        self.weekdays.increment(&message.weekday());
        self.months.increment(&message.month);

        if !message.deleted && !message.media {
            self.add_words(&message.text, stop_words);
        }

        let ts = message.timestamp;
        self.first_timestamp = Some(self.first_timestamp.map_or(ts, |t| t.min(ts)));
        self.last_timestamp = Some(self.last_timestamp.map_or(ts, |t| t.max(ts)));
    }

    fn add_words(&mut self, text: &str, stop_words: &StopWords) {
        let body = strip_edited_markers(text);
        self.messages_with_words += 1;
        for token in body.split_whitespace() {
            self.total_words += 1;
            if let Some(word) = clean_word(token) {
                if !stop_words.contains(&word) {
                    self.uncommon_words.increment(word.as_str());
                }
                self.words.increment(word.as_str());
            }
        }
    }

    /// Distinct senders in first-appearance order.
    pub fn senders(&self) -> impl Iterator<Item = &String> {
        self.sender_messages.keys()
    }

    /// Average raw tokens per word-bearing message, two decimals.
    pub fn words_per_message(&self) -> f64 {
        if self.messages_with_words == 0 {
            return 0.0;
        }
        round2(self.total_words as f64 / self.messages_with_words as f64)
    }

    /// The window the averages cover: `window` with absent bounds filled
    /// from the first and last retained message.
    pub fn effective_window(&self, window: DateWindow) -> DateWindow {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => window.or_span(first, last),
            _ => window,
        }
    }

    /// Messages per day over the effective window, two decimals.
    pub fn daily_average(&self, window: DateWindow) -> f64 {
        match self.effective_window(window).day_count() {
            Some(days) if days > 0 => round2(self.total_messages as f64 / days as f64),
            _ => 0.0,
        }
    }

    /// Senders ranked by the length of their emoji string.
    pub fn top_emoji_senders(&self, n: usize) -> Vec<(&String, &String)> {
        self.sender_emojis.ranked_by(n, |emojis| emojis.chars().count() as u64)
    }

    /// Question askers ranked, zero counts left out.
    pub fn top_question_askers(&self, n: usize) -> Vec<(&String, u64)> {
        let mut ranked = self.sender_questions.sorted();
        ranked.retain(|(_, count)| *count > 0);
        ranked.truncate(n);
        ranked
    }

    pub fn unique_emojis(&self) -> usize {
        self.emojis.len()
    }
}
