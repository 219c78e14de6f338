//! Date windows and clinic-local day boundaries
//!
//! Reports select documents whose timestamps fall inside an inclusive
//! `[start, end]` window. Dates arrive from clients as ISO-8601 strings,
//! either full RFC 3339 instants or plain `YYYY-MM-DD` dates (read as UTC
//! midnight).

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors related to temporal values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: start {start} must not be after end {end}")]
    InvalidWindow {
        start: String,
        end: String,
    },

    #[error("Invalid date '{0}': expected ISO-8601 date or date-time")]
    InvalidDate(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Parses an ISO-8601 date or date-time into a UTC instant
///
/// Accepted forms, in order:
/// - RFC 3339 with offset (`2024-03-01T08:30:00+07:00`, `2024-03-01T01:30:00Z`)
/// - local date-time without offset, read as UTC (`2024-03-01T01:30:00`)
/// - calendar date, read as UTC midnight (`2024-03-01`)
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, TemporalError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(TemporalError::InvalidDate(value.to_string()))
}

/// An inclusive time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    /// First instant inside the window
    pub start_date: DateTime<Utc>,
    /// Last instant inside the window
    pub end_date: DateTime<Utc>,
}

impl DateWindow {
    /// Creates a window, rejecting a start after the end
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    /// Parses both bounds from ISO-8601 strings
    pub fn parse(start: &str, end: &str) -> Result<Self, TemporalError> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    /// Returns true if the instant falls inside the window (both ends inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_date && instant <= self.end_date
    }
}

/// Timezone wrapper used to decide where the clinic's day begins
///
/// Wraps chrono_tz::Tz with serialization as the IANA zone name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Gets the first instant of the given local date, as UTC
    ///
    /// Where a DST jump skips local midnight the day starts at the first
    /// valid local time after it.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        match midnight.and_local_timezone(self.0) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => (midnight + Duration::hours(1))
                .and_local_timezone(self.0)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| midnight.and_utc()),
        }
    }

    /// Gets the start of the local day containing `now`
    pub fn start_of_today(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_day(now.with_timezone(&self.0).date_naive())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}
