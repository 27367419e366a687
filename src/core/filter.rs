//! Date window applied to parsed messages.
//!
//! [`DateWindow`] is a closed interval on the message timestamp. A start date
//! begins at 00:00:00 and an end date runs through 23:59:59, so a message sent
//! at either boundary minute is kept and one minute outside is dropped.
//!
//! # Example
//!
//! ```
//! use chatwrap::core::filter::DateWindow;
//! use chrono::NaiveDate;
//!
//! # fn main() -> chatwrap::Result<()> {
//! let window = DateWindow::new()
//!     .with_date_from("2024-01-01")?
//!     .with_date_to("2024-12-31")?;
//!
//! let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let eve = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(23, 59, 0).unwrap();
//! assert!(window.contains(new_year));
//! assert!(!window.contains(eve));
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - An absent bound leaves that side open
//! - [`DateWindow::day_count`] needs both bounds

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ChatwrapError;

/// Inclusive timestamp interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    /// Keep only messages on or after this moment.
    pub start: Option<NaiveDateTime>,

    /// Keep only messages on or before this moment.
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    /// An unbounded window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a window from optional calendar dates.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(start_of_day),
            end: end.map(end_of_day),
        }
    }

    /// Sets the start date (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwrapError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, ChatwrapError> {
        self.start = Some(start_of_day(parse_date(date_str)?));
        Ok(self)
    }

    /// Sets the end date (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwrapError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, ChatwrapError> {
        self.end = Some(end_of_day(parse_date(date_str)?));
        Ok(self)
    }

    /// Returns `true` if either bound is set.
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns `true` if `ts` lies inside the window.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        if self.start.is_some_and(|start| ts < start) {
            return false;
        }
        if self.end.is_some_and(|end| ts > end) {
            return false;
        }
        true
    }

    /// Number of calendar days covered, counting both ends.
    ///
    /// Returns `None` for an open window.
    pub fn day_count(&self) -> Option<i64> {
        let (start, end) = (self.start?, self.end?);
        Some((end.date() - start.date()).num_days() + 1)
    }

    /// Fills absent bounds from the given first and last timestamps.
    #[must_use]
    pub fn or_span(self, first: NaiveDateTime, last: NaiveDateTime) -> Self {
        Self {
            start: self.start.or(Some(start_of_day(first.date()))),
            end: self.end.or(Some(end_of_day(last.date()))),
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, ChatwrapError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| ChatwrapError::invalid_date(date_str))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59 is always a valid time of day
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}
