//! Line-by-line message accumulation.
//!
//! The scanner is a two-state machine. A header line opens a message (and
//! hands back the previous one); any other line extends the open message.
//! Non-blank lines seen before the first header have nowhere to go and are
//! counted as unparsable.

use std::collections::BTreeMap;

use crate::message::Message;
use crate::parsing::deletion::ADMIN_SENTINEL;
use crate::parsing::dialect::Dialect;

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Accumulating(Message),
}

/// Turns transcript lines into messages for one dialect.
#[derive(Debug)]
pub struct MessageScanner<'a> {
    dialect: Dialect,
    tag_to_name: &'a BTreeMap<String, String>,
    state: ScanState,
    line_no: usize,
    unparsable: usize,
}

/// Everything a full scan produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    pub messages: Vec<Message>,
    /// Lines dropped because no message was open.
    pub unparsable: usize,
}

impl<'a> MessageScanner<'a> {
    pub fn new(dialect: Dialect, tag_to_name: &'a BTreeMap<String, String>) -> Self {
        Self {
            dialect,
            tag_to_name,
            state: ScanState::Idle,
            line_no: 0,
            unparsable: 0,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn unparsable(&self) -> usize {
        self.unparsable
    }

    /// Feeds one line. Returns the message closed by this line, if any.
    pub fn feed(&mut self, line: &str) -> Option<Message> {
        self.line_no += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(opened) = self.open_message(line) {
            return match std::mem::replace(&mut self.state, ScanState::Accumulating(opened)) {
                ScanState::Accumulating(previous) => Some(previous),
                ScanState::Idle => None,
            };
        }

        match &mut self.state {
            ScanState::Accumulating(message) => message.push_line(line),
            ScanState::Idle if line.trim().is_empty() => {}
            ScanState::Idle => {
                self.unparsable += 1;
                tracing::warn!(line = self.line_no, content = %preview(line), "unparsable line before first message");
            }
        }
        None
    }

    /// Closes the open message, if any.
    pub fn finish(&mut self) -> Option<Message> {
        match std::mem::take(&mut self.state) {
            ScanState::Accumulating(message) => Some(message),
            ScanState::Idle => None,
        }
    }

    /// Scans a whole transcript.
    pub fn scan(mut self, text: &str) -> ScanOutput {
        let mut messages: Vec<Message> = text.lines().filter_map(|line| self.feed(line)).collect();
        messages.extend(self.finish());
        ScanOutput {
            messages,
            unparsable: self.unparsable,
        }
    }

    fn open_message(&self, line: &str) -> Option<Message> {
        let header = self.dialect.parse_header(line)?;
        let Some(timestamp) = header.timestamp() else {
            tracing::warn!(
                line = self.line_no,
                year = header.year,
                month = header.month,
                day = header.day,
                "header with impossible date treated as text"
            );
            return None;
        };

        let body = &line[header.body_start..];
        let text = if body.trim().is_empty() { ADMIN_SENTINEL } else { body };
        let sender = header.sender.map(|s| self.resolve_sender(s.trim()));
        Some(Message::new(sender, timestamp, text))
    }

    /// Replaces a phone-number sender with its configured display name.
    fn resolve_sender(&self, sender: &str) -> String {
        let looks_numeric = sender
            .chars()
            .any(|c| c.is_ascii_digit() || c.is_whitespace() || c == '+' || c == '-');
        if looks_numeric {
            let digits: String = sender.chars().filter(char::is_ascii_digit).collect();
            if let Some(name) = self.tag_to_name.get(&format!("@{digits}")) {
                return name.clone();
            }
        }
        sender.to_string()
    }
}

fn preview(line: &str) -> String {
    line.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> ScanOutput {
        let tags = BTreeMap::new();
        MessageScanner::new(Dialect::UsShortYear, &tags).scan(text)
    }

    #[test]
    fn test_one_message_per_header() {
        let out = scan("1/2/24, 10:00 - Alice: Hello there\n1/2/24, 10:01 - Bob: Hi Alice!");
        assert_eq!(out.messages.len(), 2);
        assert_eq!(out.messages[0].sender.as_deref(), Some("Alice"));
        assert_eq!(out.messages[0].text, "Hello there");
        assert_eq!(out.messages[1].sender.as_deref(), Some("Bob"));
        assert_eq!(out.messages[1].text, "Hi Alice!");
        assert_eq!(out.messages[1].minute, 1);
        assert_eq!(out.unparsable, 0);
    }

    #[test]
    fn test_continuation_lines() {
        let out = scan("1/2/24, 10:00 - Alice: first\nsecond\r\nthird\n1/2/24, 10:05 - Bob: ok");
        assert_eq!(out.messages.len(), 2);
        assert_eq!(out.messages[0].text, "first\nsecond\nthird");
    }

    #[test]
    fn test_lines_before_first_header() {
        let out = scan("garbage\nmore garbage\n1/2/24, 10:00 - Alice: hi");
        assert_eq!(out.unparsable, 2);
        assert_eq!(out.messages.len(), 1);
    }

    #[test]
    fn test_empty_body_becomes_null() {
        let out = scan("1/2/24, 10:00 - Alice:  \n1/2/24, 10:01 - Bob: x");
        assert_eq!(out.messages[0].text, "null");
    }

    #[test]
    fn test_senderless_header() {
        let out = scan("1/2/24, 10:02 - Alice added Bob");
        assert_eq!(out.messages[0].sender, None);
        assert_eq!(out.messages[0].text, "Alice added Bob");
    }

    #[test]
    fn test_impossible_date_is_continuation() {
        let out = scan("1/2/24, 10:00 - Alice: a\n2/30/24, 10:00 - Bob: b");
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].text, "a\n2/30/24, 10:00 - Bob: b");
    }

    #[test]
    fn test_phone_sender_rewritten() {
        let mut tags = BTreeMap::new();
        tags.insert("@15551234567".to_string(), "Dana".to_string());
        let out = MessageScanner::new(Dialect::UsShortYear, &tags)
            .scan("1/2/24, 10:00 - +1 555-123-4567: hey\n1/2/24, 10:01 - +44 7700 900000: yo");
        assert_eq!(out.messages[0].sender.as_deref(), Some("Dana"));
        assert_eq!(out.messages[1].sender.as_deref(), Some("+44 7700 900000"));
    }

    #[test]
    fn test_feed_and_finish() {
        let tags = BTreeMap::new();
        let mut scanner = MessageScanner::new(Dialect::DayDot, &tags);
        assert!(scanner.feed("26.10.2025, 20:40 - A: one").is_none());
        let closed = scanner.feed("26.10.2025, 20:41 - B: two").unwrap();
        assert_eq!(closed.text, "one");
        assert_eq!(scanner.finish().unwrap().text, "two");
        assert!(scanner.finish().is_none());
    }

    #[test]
    fn test_empty_input() {
        let out = scan("");
        assert!(out.messages.is_empty());
        assert_eq!(out.unparsable, 0);

        let out = scan("\n\n1/2/24, 10:00 - A: x\n");
        assert_eq!(out.unparsable, 0);
        assert_eq!(out.messages[0].text, "x");
    }
}
