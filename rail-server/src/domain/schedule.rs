//! Timetabled runs of a route.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::time::{anchor, arrival_after, hhmm};
use super::{RouteId, ScheduleId, ServiceDays};

/// A timetabled run of a route on a weekly calendar.
///
/// Seat counters for a schedule are not stored here: they live in the
/// availability ledger, which is the only place they can change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub route: RouteId,
    #[serde(with = "hhmm")]
    pub departure: NaiveTime,
    /// At or before `departure` means arrival on the following day.
    #[serde(with = "hhmm")]
    pub arrival: NaiveTime,
    pub runs_on: ServiceDays,
    pub is_active: bool,
}

impl Schedule {
    /// Whether this schedule runs on the given date.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.runs_on.runs_on(date)
    }

    /// Departure instant when boarding on `date`.
    pub fn departs_on(&self, date: NaiveDate) -> NaiveDateTime {
        anchor(date, self.departure)
    }

    /// Arrival instant for a run departing on `date`.
    pub fn arrives_for(&self, date: NaiveDate) -> NaiveDateTime {
        arrival_after(self.departs_on(date), self.arrival)
    }

    /// Whether the run arrives on a later day than it departs.
    pub fn is_overnight(&self) -> bool {
        self.arrival <= self.departure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_hhmm;

    fn schedule(dep: &str, arr: &str, days: &str) -> Schedule {
        Schedule {
            id: ScheduleId(1),
            route: RouteId(1),
            departure: parse_hhmm(dep).unwrap(),
            arrival: parse_hhmm(arr).unwrap(),
            runs_on: ServiceDays::parse(days).unwrap(),
            is_active: true,
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    #[test]
    fn same_day_run() {
        let s = schedule("08:45", "14:30", "0123456");
        assert!(!s.is_overnight());
        assert_eq!(s.arrives_for(monday()).date(), monday());
    }

    #[test]
    fn overnight_run() {
        let s = schedule("19:20", "11:50", "0123456");
        assert!(s.is_overnight());
        assert_eq!(s.arrives_for(monday()).date(), monday().succ_opt().unwrap());
    }

    #[test]
    fn calendar_check() {
        let s = schedule("08:45", "14:30", "12");
        assert!(!s.runs_on(monday()));
        assert!(s.runs_on(monday().succ_opt().unwrap()));
    }

    #[test]
    fn serializes_times_as_hhmm() {
        let s = schedule("08:45", "14:30", "0");
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["departure"], "08:45");
        assert_eq!(json["arrival"], "14:30");
        assert_eq!(json["runs_on"], "0");
    }
}
