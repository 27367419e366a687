//! Transcript dialect detection and header parsing.
//!
//! WhatsApp writes a different header in front of every message depending on
//! the phone's platform and locale. Four dialects are recognized, in this
//! order:
//!
//! | Dialect | Example header |
//! |---------|----------------|
//! | [`UsShortYear`](Dialect::UsShortYear) | `1/2/24, 10:00 PM - Alice: ` |
//! | [`IsoBracketed`](Dialect::IsoBracketed) | `[2024-01-02, 10:00:00 PM] Alice: ` |
//! | [`DaySlash`](Dialect::DaySlash) | `2/1/2024, 22:00 - Alice: ` |
//! | [`DayDot`](Dialect::DayDot) | `2.1.2024, 22:00 - Alice: ` |
//!
//! [`detect_dialect`] counts header matches at line starts over the whole
//! transcript and picks the strictly highest count. Ties, including a
//! transcript with no header at all, go to the first dialect in the table.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// A recognized header/timestamp line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// `M/D/YY, H:MM[ AM|PM] - Sender: text`
    #[default]
    UsShortYear,
    /// `[YYYY-MM-DD, H:MM:SS AM|PM] Sender: text`
    IsoBracketed,
    /// `D/M/YYYY, H:MM - Sender: text`
    DaySlash,
    /// `D.M.YYYY, H:MM - Sender: text`
    DayDot,
}

impl Dialect {
    /// All dialects in tie-break order.
    pub const ALL: [Dialect; 4] = [
        Dialect::UsShortYear,
        Dialect::IsoBracketed,
        Dialect::DaySlash,
        Dialect::DayDot,
    ];

    fn index(self) -> usize {
        match self {
            Dialect::UsShortYear => 0,
            Dialect::IsoBracketed => 1,
            Dialect::DaySlash => 2,
            Dialect::DayDot => 3,
        }
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::UsShortYear => "M/D/YY",
            Dialect::IsoBracketed => "[YYYY-MM-DD]",
            Dialect::DaySlash => "D/M/YYYY",
            Dialect::DayDot => "D.M.YYYY",
        }
    }

    /// Multi-line pattern used for counting.
    pub fn detection_pattern(self) -> &'static str {
        match self {
            Dialect::UsShortYear => r"(?m)^\d{1,2}/\d{1,2}/\d{2}, \d{2}:\d{2}(?: (?:AM|PM))?",
            Dialect::IsoBracketed => r"(?m)^\[\d{4}-\d{2}-\d{2}, \d{1,2}:\d{2}:\d{2} (?:AM|PM)\]",
            Dialect::DaySlash => r"(?m)^\d{1,2}/\d{1,2}/\d{4}, \d{1,2}:\d{2}",
            Dialect::DayDot => r"(?m)^\d{1,2}\.\d{1,2}\.\d{4}, \d{1,2}:\d{2}",
        }
    }

    /// Pattern matching the header at the start of one line.
    ///
    /// The match covers everything up to the message body, so the body is
    /// the rest of the line.
    pub fn header_pattern(self) -> &'static str {
        match self {
            Dialect::UsShortYear => {
                r"^(?P<month>\d{1,2})/(?P<day>\d{1,2})/(?P<year>\d{2}), (?P<hour>\d{1,2}):(?P<minute>\d{2})(?: (?P<ampm>AM|PM))? (?:- )?(?:(?P<sender>[^:]+): )?"
            }
            Dialect::IsoBracketed => {
                r"^ ?\[(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2}), (?P<hour>\d{1,2}):(?P<minute>\d{2}):\d{2} (?P<ampm>AM|PM)\] (?P<sender>.*?): "
            }
            Dialect::DaySlash => {
                r"^(?P<day>\d{1,2})/(?P<month>\d{1,2})/(?P<year>\d{4}), (?P<hour>\d{1,2}):(?P<minute>\d{2}) (?:- )?(?:(?P<sender>[^:]+): )?"
            }
            Dialect::DayDot => {
                r"^(?P<day>\d{1,2})\.(?P<month>\d{1,2})\.(?P<year>\d{4}), (?P<hour>\d{1,2}):(?P<minute>\d{2}) (?:- )?(?:(?P<sender>[^:]+): )?"
            }
        }
    }

    fn header_regex(self) -> &'static Regex {
        &HEADERS[self.index()]
    }

    /// Matches a header at the start of `line`.
    pub fn parse_header(self, line: &str) -> Option<Header> {
        let caps = self.header_regex().captures(line)?;
        let num = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

        let mut year = i32::try_from(num("year")?).ok()?;
        if self == Dialect::UsShortYear {
            year += 2000;
        }
        let mut hour = num("hour")?;
        match caps.name("ampm").map(|m| m.as_str()) {
            Some("PM") if hour != 12 => hour += 12,
            Some("AM") if hour == 12 => hour = 0,
            _ => {}
        }

        Some(Header {
            year,
            month: num("month")?,
            day: num("day")?,
            hour,
            minute: num("minute")?,
            sender: caps.name("sender").map(|m| m.as_str().to_string()),
            body_start: caps.get(0).map_or(0, |m| m.end()),
        })
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("dialect patterns are valid regexes")
}

static DETECTORS: LazyLock<[Regex; 4]> =
    LazyLock::new(|| Dialect::ALL.map(|d| compile(d.detection_pattern())));

static HEADERS: LazyLock<[Regex; 4]> =
    LazyLock::new(|| Dialect::ALL.map(|d| compile(d.header_pattern())));

/// Fields captured from a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 24-hour clock.
    pub hour: u32,
    pub minute: u32,
    pub sender: Option<String>,
    /// Byte offset where the body text begins.
    pub body_start: usize,
}

impl Header {
    /// The composed timestamp, `None` for an impossible date or time.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(self.hour, self.minute, 0)
    }
}

/// Header match counts per dialect, in [`Dialect::ALL`] order.
pub fn dialect_scores(text: &str) -> [usize; 4] {
    Dialect::ALL.map(|d| DETECTORS[d.index()].find_iter(text).count())
}

/// Picks the dialect with the strictly highest header count.
pub fn detect_dialect(text: &str) -> Dialect {
    let scores = dialect_scores(text);
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    let dialect = Dialect::ALL[best];
    tracing::debug!(%dialect, ?scores, "detected transcript dialect");
    dialect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_us_short_year() {
        let text = "1/2/24, 10:00 - Alice: Hello there\n1/2/24, 10:01 - Bob: Hi Alice!";
        assert_eq!(detect_dialect(text), Dialect::UsShortYear);
    }

    #[test]
    fn test_detect_iso_bracketed() {
        let text = "[2024-01-02, 10:00:00 AM] Alice: Hello\n[2024-01-02, 10:01:00 AM] Bob: Hi";
        assert_eq!(detect_dialect(text), Dialect::IsoBracketed);
    }

    #[test]
    fn test_detect_day_slash() {
        let text = "15/01/2024, 10:30 - Alice: Hello\n15/01/2024, 10:31 - Bob: Hi";
        assert_eq!(detect_dialect(text), Dialect::DaySlash);
    }

    #[test]
    fn test_detect_day_dot() {
        let text = "26.10.2025, 20:40 - Alice: Hello\n26.10.2025, 20:41 - Bob: Hi";
        assert_eq!(detect_dialect(text), Dialect::DayDot);
    }

    #[test]
    fn test_no_match_defaults_to_first() {
        assert_eq!(detect_dialect("just some text\nand more"), Dialect::UsShortYear);
        assert_eq!(dialect_scores(""), [0, 0, 0, 0]);
    }

    #[test]
    fn test_tie_goes_to_first_defined() {
        let text = "[2024-01-02, 10:00:00 AM] Alice: Hello\n15/01/2024, 10:30 - Bob: Hi";
        assert_eq!(dialect_scores(text), [0, 1, 1, 0]);
        assert_eq!(detect_dialect(text), Dialect::IsoBracketed);
    }

    #[test]
    fn test_majority_wins() {
        let text = "15/01/2024, 10:30 - A: x\n26.10.2025, 20:40 - B: y\n26.10.2025, 20:41 - B: z";
        assert_eq!(detect_dialect(text), Dialect::DayDot);
    }

    #[test]
    fn test_parse_us_header_with_sender() {
        let line = "1/2/24, 10:00 - Alice: Hello there";
        let h = Dialect::UsShortYear.parse_header(line).unwrap();
        assert_eq!((h.year, h.month, h.day, h.hour, h.minute), (2024, 1, 2, 10, 0));
        assert_eq!(h.sender.as_deref(), Some("Alice"));
        assert_eq!(&line[h.body_start..], "Hello there");
    }

    #[test]
    fn test_parse_us_header_without_sender() {
        let line = "1/2/24, 10:02 - Alice added Bob";
        let h = Dialect::UsShortYear.parse_header(line).unwrap();
        assert_eq!(h.sender, None);
        assert_eq!(&line[h.body_start..], "Alice added Bob");
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let pm = Dialect::UsShortYear.parse_header("3/4/24, 1:15 PM - A: x").unwrap();
        assert_eq!(pm.hour, 13);
        let noon = Dialect::UsShortYear.parse_header("3/4/24, 12:15 PM - A: x").unwrap();
        assert_eq!(noon.hour, 12);
        let midnight = Dialect::UsShortYear.parse_header("3/4/24, 12:15 AM - A: x").unwrap();
        assert_eq!(midnight.hour, 0);
    }

    #[test]
    fn test_parse_iso_header() {
        let line = "[2024-06-15, 9:05:59 PM] Bob: evening";
        let h = Dialect::IsoBracketed.parse_header(line).unwrap();
        assert_eq!((h.year, h.month, h.day, h.hour, h.minute), (2024, 6, 15, 21, 5));
        assert_eq!(h.sender.as_deref(), Some("Bob"));
        assert_eq!(&line[h.body_start..], "evening");

        let leading_space = " [2024-06-15, 9:05:59 AM] Bob: x";
        assert!(Dialect::IsoBracketed.parse_header(leading_space).is_some());
    }

    #[test]
    fn test_parse_day_first_headers() {
        let h = Dialect::DaySlash.parse_header("2/1/2024, 22:00 - Alice: hi").unwrap();
        assert_eq!((h.day, h.month, h.year, h.hour), (2, 1, 2024, 22));

        let h = Dialect::DayDot.parse_header("2.1.2024, 7:30 - Alice: hi").unwrap();
        assert_eq!((h.day, h.month, h.year, h.hour, h.minute), (2, 1, 2024, 7, 30));
    }

    #[test]
    fn test_continuation_line_is_not_a_header() {
        assert!(Dialect::UsShortYear.parse_header("and this continues").is_none());
        assert!(Dialect::DayDot.parse_header("1/2/24, 10:00 - A: x").is_none());
    }

    #[test]
    fn test_invalid_calendar_date() {
        let h = Dialect::UsShortYear.parse_header("2/30/24, 10:00 - A: x").unwrap();
        assert!(h.timestamp().is_none());
        let ok = Dialect::UsShortYear.parse_header("2/29/24, 10:00 - A: x").unwrap();
        assert!(ok.timestamp().is_some());
    }
}
