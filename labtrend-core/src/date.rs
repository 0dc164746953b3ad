//! Calendar-day parsing for sample dates.
//!
//! Lab reports arrive with `YYYY-MM-DD` or `DD/MM/YYYY` dates and the odd
//! free-form timestamp. Everything is reduced to a day without time zone; text
//! that cannot be read becomes [`SampleDate::Unknown`], which sorts after every
//! known day.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Parsed calendar day of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SampleDate {
    Day(NaiveDate),
    /// Unparsable date text. Ordered after every known day.
    Unknown,
}

impl SampleDate {
    pub fn day(self) -> Option<NaiveDate> {
        match self {
            SampleDate::Day(day) => Some(day),
            SampleDate::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, SampleDate::Day(_))
    }
}

impl From<NaiveDate> for SampleDate {
    fn from(day: NaiveDate) -> Self {
        SampleDate::Day(day)
    }
}

impl fmt::Display for SampleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleDate::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            SampleDate::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for SampleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.day().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SampleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let day = Option::<NaiveDate>::deserialize(deserializer)?;
        Ok(day.map_or(SampleDate::Unknown, SampleDate::Day))
    }
}

/// Parse a sample date.
///
/// Tried in order, first structural match wins:
/// 1. `YYYY-MM-DD`: three `-` segments, the first one four characters long.
/// 2. `DD/MM/YYYY`: three `/` segments.
/// 3. Generic timestamps (RFC 3339, RFC 2822, English month names).
///
/// A string that matches rule 1 or 2 structurally is never retried against the
/// later rules: overflowing parts roll forward (`2025-02-30` is 2 March) and a
/// non-numeric segment makes the date unknown.
pub fn parse_sample_date(text: &str) -> SampleDate {
    let iso = split_three(text, '-').filter(|parts| parts[0].chars().count() == 4);
    let parsed = if let Some([year, month, day]) = iso {
        calendar_day(year, month, day)
    } else if let Some([day, month, year]) = split_three(text, '/') {
        calendar_day(year, month, day)
    } else {
        parse_generic(text)
    };

    match parsed {
        Some(day) => SampleDate::Day(day),
        None => {
            tracing::debug!(date = text, "unreadable sample date");
            SampleDate::Unknown
        }
    }
}

fn split_three(text: &str, separator: char) -> Option<[&str; 3]> {
    let mut parts = text.split(separator);
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some([first, second, third])
}

/// Day from numeric year, 1-based month and day segments.
///
/// Out-of-range parts carry over: month 13 is January of the next year, day 30
/// of February runs into March and day 0 is the last day of the previous month.
/// Years 0 to 99 are read as 1900 to 1999.
fn calendar_day(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let mut year = leading_int(year)?;
    let month = leading_int(month)?;
    let day = leading_int(day)?;

    if (0..=99).contains(&year) {
        year += 1900;
    }

    let month_index = month.checked_sub(1)?;
    let year = year.checked_add(month_index.div_euclid(12))?;
    let month = u32::try_from(month_index.rem_euclid(12) + 1).ok()?;

    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    first.checked_add_signed(Duration::try_days(day.checked_sub(1)?)?)
}

/// Integer prefix of a segment: optional sign followed by digits, trailing text ignored.
fn leading_int(segment: &str) -> Option<i64> {
    let trimmed = segment.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let value = digits.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

const GENERIC_DATE_FORMATS: [&str; 4] = ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

fn parse_generic(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(text) {
        return Some(timestamp.date_naive());
    }

    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
