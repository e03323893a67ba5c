//! Time-of-day handling for timetables.
//!
//! Schedules store departure and arrival as a time of day with no date.
//! An arrival that is not after its departure means the train arrives on the
//! following day, so turning a timetable entry into real instants always
//! happens relative to an earlier instant.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a time of day from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use rail_server::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("1430").is_err());
/// assert!(parse_hhmm("14:3").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    if s.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();
    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Format a time of day as "HH:MM".
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Place a time of day on a date.
pub fn anchor(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Place `time` on `date`, rolling it to the following day if that instant
/// is not strictly after `reference`.
///
/// Only one day is ever added, so a result can still be earlier than
/// `reference` when `date` is before `reference`'s date.
///
/// # Examples
///
/// ```
/// use rail_server::domain::{anchor, next_after, parse_hhmm};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
/// let arrived = anchor(date, parse_hhmm("23:00").unwrap());
///
/// // 00:30 is read as half past midnight on the next day
/// let departs = next_after(date, parse_hhmm("00:30").unwrap(), arrived);
/// assert_eq!(departs.date(), date.succ_opt().unwrap());
/// assert_eq!((departs - arrived).num_minutes(), 90);
/// ```
pub fn next_after(date: NaiveDate, time: NaiveTime, reference: NaiveDateTime) -> NaiveDateTime {
    let instant = anchor(date, time);
    if instant <= reference {
        instant + Duration::days(1)
    } else {
        instant
    }
}

/// The arrival instant of a run that departs at `departure`.
///
/// An arrival time of day at or before the departure time of day means
/// next-day arrival.
pub fn arrival_after(departure: NaiveDateTime, arrival: NaiveTime) -> NaiveDateTime {
    next_after(departure.date(), arrival, departure)
}

/// Whole minutes from `from` to `to`; negative if `to` is earlier.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    to.signed_duration_since(from).num_minutes()
}

/// Serde support for "HH:MM" time-of-day fields.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}
