//! Direct search: single-train itineraries between two stations.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{Money, Route, Schedule, SeatClass, StationId, TravelDuration};

use super::Timetable;

/// A single train from source to destination on the requested date.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectOption {
    pub route: Arc<Route>,
    pub schedule: Arc<Schedule>,
    /// Seats free in the requested class when the search ran.
    pub available_seats: u32,
    pub fare: Money,
    pub duration: TravelDuration,
}

/// Active schedules of `route` that run on `date` and have a free seat in
/// `class`, with the seats observed.
pub(super) fn bookable_schedules<T: Timetable + ?Sized>(
    timetable: &T,
    route: &Route,
    date: NaiveDate,
    class: SeatClass,
) -> Vec<(Arc<Schedule>, u32)> {
    timetable
        .schedules_for(route.id)
        .into_iter()
        .filter(|s| s.is_active && s.runs_on(date))
        .filter_map(|s| {
            let available = timetable.available(s.id, class);
            (available > 0).then_some((s, available))
        })
        .collect()
}

/// Find every bookable direct run from `source` to `destination`.
///
/// Results follow timetable order: routes as stored, then schedules by
/// departure. An empty result means no service that day.
pub fn find_direct<T: Timetable + ?Sized>(
    timetable: &T,
    source: StationId,
    destination: StationId,
    date: NaiveDate,
    class: SeatClass,
) -> Vec<DirectOption> {
    timetable
        .routes_from(source)
        .into_iter()
        .filter(|r| r.is_active && r.destination == destination)
        .flat_map(|route| {
            bookable_schedules(timetable, &route, date, class)
                .into_iter()
                .map(move |(schedule, available_seats)| DirectOption {
                    fare: route.fare(),
                    duration: route.duration,
                    route: Arc::clone(&route),
                    schedule,
                    available_seats,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::mock::{DEFAULT_SEATS, MockTimetable, monday};

    #[test]
    fn single_daily_run() {
        let mut tt = MockTimetable::new();
        let mas = tt.add_station("MAS");
        let hwh = tt.add_station("HWH");
        let route = tt.route(mas, hwh, 1659, "0.50");
        let schedule = tt.daily(route, "08:45", "14:30");
        tt.set_seats(schedule, SeatClass::Sleeper, 576);

        let options = find_direct(&tt, mas, hwh, monday(), SeatClass::Sleeper);

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].fare.to_string(), "829.50");
        assert_eq!(options[0].available_seats, 576);
        assert_eq!(options[0].schedule.id, schedule);
        assert_eq!(options[0].duration.to_string(), "1h 0m");
    }

    #[test]
    fn weekday_must_be_served() {
        let mut tt = MockTimetable::new();
        let a = tt.add_station("A");
        let b = tt.add_station("B");
        let route = tt.route(a, b, 10, "1");
        tt.schedule(route, "08:00", "09:00", "56");
        let weekdays = tt.schedule(route, "10:00", "11:00", "01234");
        tt.schedule(route, "12:00", "13:00", "");

        let options = find_direct(&tt, a, b, monday(), SeatClass::General);
        let ids: Vec<_> = options.iter().map(|o| o.schedule.id).collect();
        assert_eq!(ids, vec![weekdays]);
    }

    #[test]
    fn sold_out_class_excluded() {
        let mut tt = MockTimetable::new();
        let a = tt.add_station("A");
        let b = tt.add_station("B");
        let route = tt.route(a, b, 10, "1");
        let schedule = tt.daily(route, "08:00", "09:00");
        tt.set_seats(schedule, SeatClass::AcFirst, 0);

        assert!(find_direct(&tt, a, b, monday(), SeatClass::AcFirst).is_empty());
        let sleeper = find_direct(&tt, a, b, monday(), SeatClass::Sleeper);
        assert_eq!(sleeper[0].available_seats, DEFAULT_SEATS);
    }

    #[test]
    fn inactive_records_excluded() {
        let mut tt = MockTimetable::new();
        let a = tt.add_station("A");
        let b = tt.add_station("B");
        let closed = tt.route(a, b, 10, "1");
        tt.daily(closed, "08:00", "09:00");
        tt.deactivate_route(closed);

        let other = tt.route(a, b, 12, "1");
        let cancelled = tt.daily(other, "07:00", "08:00");
        let running = tt.daily(other, "09:00", "10:00");
        tt.deactivate_schedule(cancelled);

        let options = find_direct(&tt, a, b, monday(), SeatClass::Sleeper);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].schedule.id, running);
    }

    #[test]
    fn order_follows_routes_then_departures() {
        let mut tt = MockTimetable::new();
        let a = tt.add_station("A");
        let b = tt.add_station("B");
        let first = tt.route(a, b, 10, "1");
        let second = tt.route(a, b, 20, "1");
        let s1 = tt.daily(first, "18:00", "19:00");
        let s2 = tt.daily(first, "06:00", "07:00");
        let s3 = tt.daily(second, "05:00", "06:00");

        let ids: Vec<_> = find_direct(&tt, a, b, monday(), SeatClass::Sleeper)
            .iter()
            .map(|o| o.schedule.id)
            .collect();
        assert_eq!(ids, vec![s2, s1, s3]);
    }

    #[test]
    fn other_destinations_ignored() {
        let mut tt = MockTimetable::new();
        let a = tt.add_station("A");
        let b = tt.add_station("B");
        let c = tt.add_station("C");
        let route = tt.route(a, c, 10, "1");
        tt.daily(route, "08:00", "09:00");

        assert!(find_direct(&tt, a, b, monday(), SeatClass::Sleeper).is_empty());
    }
}
