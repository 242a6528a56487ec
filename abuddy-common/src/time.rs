//! Calendar date utilities
//!
//! All status comparisons use day granularity in UTC. Incoming timestamps
//! are normalised to UTC before the time of day is dropped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar date in UTC
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a UTC calendar date
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            Error::InvalidInput(format!(
                "Invalid date '{}': expected YYYY-MM-DD or an RFC 3339 timestamp",
                input
            ))
        })
}

/// Calendar date as it crosses the API boundary
///
/// Deserializes from either accepted input format and always serializes as
/// `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(pub NaiveDate);

impl CalendarDate {
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_calendar_date(s).map(CalendarDate)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_today_matches_now() {
        let before = now().date_naive();
        let day = today();
        let after = now().date_naive();
        assert!(before <= day && day <= after);
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_calendar_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_calendar_date(" 2024-01-31 ").unwrap(), date(2024, 1, 31));
    }

    #[test]
    fn test_parse_rfc3339_normalises_to_utc() {
        assert_eq!(
            parse_calendar_date("2024-03-10T23:30:00-05:00").unwrap(),
            date(2024, 3, 11)
        );
        assert_eq!(
            parse_calendar_date("2024-03-10T00:15:00+02:00").unwrap(),
            date(2024, 3, 9)
        );
        assert_eq!(
            parse_calendar_date("2024-03-10T12:00:00.000Z").unwrap(),
            date(2024, 3, 10)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_calendar_date("tomorrow"), Err(Error::InvalidInput(_))));
        assert!(parse_calendar_date("2023-02-29").is_err());
        assert!(parse_calendar_date("").is_err());
    }

    #[test]
    fn test_calendar_date_serde() {
        let parsed: CalendarDate = serde_json::from_str("\"2024-05-01T22:00:00-04:00\"").unwrap();
        assert_eq!(parsed.date(), date(2024, 5, 2));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"2024-05-02\"");

        let bad: std::result::Result<CalendarDate, _> = serde_json::from_str("\"05/02/2024\"");
        assert!(bad.is_err());
    }
}
