//! # Time Utilities
//!
//! Shared helpers for the wall-clock arithmetic behind conflict detection and
//! slot generation. All instants are `NaiveDateTime` values expressed in the
//! clinic's designated zone (see `CLINIC_TIMEZONE` in the API config).

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::errors::{ClinicError, ClinicResult};

/// Length of a generated slot when the caller does not ask for another.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// Duration of an appointment booked without an explicit duration.
pub const DEFAULT_APPOINTMENT_MINUTES: u32 = 30;

/// Upper bound on a single appointment's duration (one day).
pub const MAX_APPOINTMENT_MINUTES: u32 = 24 * 60;

/// A half-open `[start, end)` span of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Builds the interval covering `minutes` from `start`.
    pub fn from_duration(start: NaiveDateTime, minutes: u32) -> Self {
        Self {
            start,
            end: end_of(start, minutes),
        }
    }
}

/// Instant `minutes` after `start`.
pub fn end_of(start: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    start + Duration::minutes(i64::from(minutes))
}

/// `[date 00:00, date+1 00:00)`
pub fn day_bounds(date: NaiveDate) -> Interval {
    let start = date.and_time(NaiveTime::MIN);
    Interval::new(start, start + Duration::days(1))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ClinicError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Parses an ISO-8601 datetime into clinic wall-clock time.
///
/// Values carrying an offset (`2024-05-01T10:00:00Z`, `...+02:00`, `...T10:00Z`)
/// are converted into `zone`; values without one are taken as already local.
/// A bare date (`2024-05-01`) means midnight of that day.
pub fn parse_instant(raw: &str, zone: Tz) -> ClinicResult<NaiveDateTime> {
    let raw = raw.trim();

    if let Some(with_offset) = parse_with_offset(raw) {
        return Ok(with_offset.with_timezone(&zone).naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| {
            ClinicError::InvalidInput(format!("Invalid date '{}', expected an ISO-8601 datetime", raw))
        })
}

fn parse_with_offset(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    // RFC 3339 requires seconds; ISO-8601 lets them go
    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(local) => format!("{}+00:00", local),
        None => raw.to_string(),
    };
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z").ok()
}

/// Renders a time of day as `HH:mm`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter storing a `NaiveTime` as `"HH:mm"`, accepting `"HH:mm:ss"` on input.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| D::Error::custom(format!("invalid time of day '{}'", raw)))
    }
}
