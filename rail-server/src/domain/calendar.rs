//! Weekly service calendars.
//!
//! Timetables record the days a train runs as a string of weekday digits,
//! `0` for Monday through `6` for Sunday (so `"0123456"` is daily and
//! `"5"` is Saturdays only). The string is parsed once, at load time, into a
//! 7-bit set.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid calendar string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service calendar {input:?}: {reason}")]
pub struct InvalidCalendar {
    input: String,
    reason: &'static str,
}

impl InvalidCalendar {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// The set of weekdays a schedule runs on.
///
/// Bit 0 is Monday, bit 6 is Sunday. An empty set is valid and never
/// matches any date.
///
/// # Examples
///
/// ```
/// use rail_server::domain::ServiceDays;
/// use chrono::NaiveDate;
///
/// let weekends = ServiceDays::parse("56").unwrap();
/// let saturday = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
/// let monday = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
/// assert!(weekends.runs_on(saturday));
/// assert!(!weekends.runs_on(monday));
///
/// // Duplicates and out-of-range digits are rejected
/// assert!(ServiceDays::parse("00").is_err());
/// assert!(ServiceDays::parse("7").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceDays(u8);

impl ServiceDays {
    /// Runs every day.
    pub const DAILY: ServiceDays = ServiceDays(0b111_1111);

    /// Never runs.
    pub const NEVER: ServiceDays = ServiceDays(0);

    /// Parse a calendar string of distinct digits `0`-`6`.
    ///
    /// The digits may appear in any order; an empty string yields
    /// [`ServiceDays::NEVER`].
    pub fn parse(s: &str) -> Result<Self, InvalidCalendar> {
        if s.len() > 7 {
            return Err(InvalidCalendar::new(s, "at most 7 weekday digits"));
        }

        let mut bits = 0u8;
        for c in s.chars() {
            let day = match c.to_digit(10) {
                Some(d) if d <= 6 => d,
                _ => return Err(InvalidCalendar::new(s, "expected digits 0-6")),
            };
            let bit = 1u8 << day;
            if bits & bit != 0 {
                return Err(InvalidCalendar::new(s, "duplicate weekday"));
            }
            bits |= bit;
        }

        Ok(ServiceDays(bits))
    }

    /// Build a set from explicit weekdays.
    pub fn from_weekdays(days: &[Weekday]) -> Self {
        ServiceDays(
            days.iter()
                .fold(0u8, |acc, d| acc | 1 << d.num_days_from_monday()),
        )
    }

    /// Whether the set contains this weekday.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Whether a service with this calendar runs on the given date.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of days per week.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl fmt::Display for ServiceDays {
    /// Canonical string form: ascending digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in 0..7u8 {
            if self.0 & (1 << day) != 0 {
                write!(f, "{day}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceDays({self})")
    }
}

impl TryFrom<String> for ServiceDays {
    type Error = InvalidCalendar;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceDays> for String {
    fn from(days: ServiceDays) -> Self {
        days.to_string()
    }
}
