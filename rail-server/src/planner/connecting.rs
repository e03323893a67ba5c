//! Connection search: two-train itineraries through one intermediate station.
//!
//! For each bookable first leg out of the source, every bookable second leg
//! from that leg's destination to the final destination is timed against it.
//! A second leg is feasible when it leaves at least the minimum connection
//! time after the first leg arrives. Of the feasible second legs, the one
//! arriving earliest is kept; each first leg yields at most one itinerary.
//!
//! Connections are timed on the journey date's clock: the first leg's
//! departure and arrival times are both placed on that date, even when the
//! run is overnight. Only the second leg rolls into the next day.
//!
//! The choice is made per first leg, not across the whole result set.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{
    Money, Route, Schedule, SeatClass, StationId, anchor, arrival_after, minutes_between,
    next_after,
};

use super::Timetable;
use super::direct::bookable_schedules;
use super::rank::rank_connections;

/// One train of a connecting itinerary, timed for the journey.
///
/// A first leg's `arrival` is its arrival time on the journey date; a
/// second leg's `arrival` is always after its `departure`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegOption {
    pub route: Arc<Route>,
    pub schedule: Arc<Schedule>,
    pub available_seats: u32,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
}

/// Two legs joined at an intermediate station.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectingOption {
    pub first: LegOption,
    pub second: LegOption,
    /// Minutes between arriving on the first leg and leaving on the second.
    pub buffer_minutes: i64,
    pub total_fare: Money,
    pub total_distance_km: u32,
    /// Arrival at the final destination.
    pub total_arrival: NaiveDateTime,
}

impl ConnectingOption {
    pub fn intermediate(&self) -> StationId {
        self.first.route.destination
    }
}

/// Find two-leg itineraries from `source` to `destination` departing on
/// `date`, sorted by arrival at the destination.
pub fn find_connecting<T: Timetable + ?Sized>(
    timetable: &T,
    source: StationId,
    destination: StationId,
    date: NaiveDate,
    class: SeatClass,
    min_buffer: Duration,
) -> Vec<ConnectingOption> {
    let mut options = Vec::new();

    let first_routes = timetable
        .routes_from(source)
        .into_iter()
        .filter(|r| r.is_active && r.destination != destination);

    for first_route in first_routes {
        let seconds: Vec<(Arc<Route>, Arc<Schedule>, u32)> = timetable
            .routes_from(first_route.destination)
            .into_iter()
            .filter(|r| r.is_active && r.destination == destination)
            .flat_map(|route| {
                bookable_schedules(timetable, &route, date, class)
                    .into_iter()
                    .map(move |(schedule, seats)| (Arc::clone(&route), schedule, seats))
            })
            .collect();

        if seconds.is_empty() {
            continue;
        }

        for (schedule, available_seats) in bookable_schedules(timetable, &first_route, date, class)
        {
            let first = LegOption {
                departure: schedule.departs_on(date),
                arrival: anchor(date, schedule.arrival),
                route: Arc::clone(&first_route),
                schedule,
                available_seats,
            };

            if let Some(option) = best_connection(first, &seconds, date, min_buffer) {
                options.push(option);
            }
        }
    }

    rank_connections(options)
}

/// Pair `first` with the feasible second leg that arrives earliest.
///
/// A second leg departs on the journey date, or the next day when that
/// would not be after the first leg's arrival. Ties keep the earlier
/// candidate.
fn best_connection(
    first: LegOption,
    seconds: &[(Arc<Route>, Arc<Schedule>, u32)],
    date: NaiveDate,
    min_buffer: Duration,
) -> Option<ConnectingOption> {
    let mut best: Option<LegOption> = None;

    for (route, schedule, available_seats) in seconds {
        let departure = next_after(date, schedule.departure, first.arrival);
        if departure - first.arrival < min_buffer {
            continue;
        }

        let arrival = arrival_after(departure, schedule.arrival);
        if best.as_ref().is_none_or(|b| arrival < b.arrival) {
            best = Some(LegOption {
                route: Arc::clone(route),
                schedule: Arc::clone(schedule),
                available_seats: *available_seats,
                departure,
                arrival,
            });
        }
    }

    let second = best?;
    Some(ConnectingOption {
        buffer_minutes: minutes_between(first.arrival, second.departure),
        total_fare: first.route.fare() + second.route.fare(),
        total_distance_km: first.route.distance_km + second.route.distance_km,
        total_arrival: second.arrival,
        first,
        second,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::planner::mock::{MockTimetable, monday};
    use crate::domain::RouteId;
    use chrono::{NaiveTime, Timelike};
    use proptest::prelude::*;

    fn hhmm() -> impl Strategy<Value = String> {
        (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{h:02}:{m:02}"))
    }

    fn leg_times() -> impl Strategy<Value = Vec<(String, String)>> {
        proptest::collection::vec((hhmm(), hhmm()), 1..6)
    }

    fn minute_of_day(time: NaiveTime) -> i64 {
        i64::from(time.hour() * 60 + time.minute())
    }

    /// Buffer and final arrival, in minutes from midnight on the journey
    /// date, for a first leg arriving at `first_arrival` and a second leg
    /// running `departure` to `arrival`.
    fn expected_timing(
        first_arrival: NaiveTime,
        departure: NaiveTime,
        arrival: NaiveTime,
    ) -> (i64, i64) {
        let first_arrival = minute_of_day(first_arrival);
        let mut departure = minute_of_day(departure);
        if departure <= first_arrival {
            departure += 24 * 60;
        }
        let mut arrival = minute_of_day(arrival);
        while arrival <= departure {
            arrival += 24 * 60;
        }
        (departure - first_arrival, arrival)
    }

    fn minutes_from_midnight(instant: NaiveDateTime) -> i64 {
        minutes_between(anchor(monday(), NaiveTime::default()), instant)
    }

    fn triangle(
        firsts: &[(String, String)],
        seconds: &[(String, String)],
    ) -> (MockTimetable, StationId, StationId, RouteId, RouteId) {
        let mut tt = MockTimetable::new();
        let a = tt.add_station("A");
        let b = tt.add_station("B");
        let c = tt.add_station("C");
        let ab = tt.route(a, b, 10, "1");
        let bc = tt.route(b, c, 10, "1");
        for (dep, arr) in firsts {
            tt.daily(ab, dep, arr);
        }
        for (dep, arr) in seconds {
            tt.daily(bc, dep, arr);
        }
        (tt, a, c, ab, bc)
    }

    proptest! {
        /// No itinerary connects faster than the minimum buffer, and no
        /// feasible second leg arrives earlier than the one chosen.
        #[test]
        fn chosen_second_leg_is_feasible_and_earliest(
            firsts in leg_times(),
            seconds in leg_times(),
            min_buffer in 0i64..180,
        ) {
            let (tt, a, c, _, bc) = triangle(&firsts, &seconds);
            let min = Duration::minutes(min_buffer);
            let options = find_connecting(&tt, a, c, monday(), SeatClass::Sleeper, min);

            for window in options.windows(2) {
                prop_assert!(window[0].total_arrival <= window[1].total_arrival);
            }

            for option in &options {
                let first_arrival = option.first.schedule.arrival;
                let (buffer, arrival) = expected_timing(
                    first_arrival,
                    option.second.schedule.departure,
                    option.second.schedule.arrival,
                );
                prop_assert_eq!(option.buffer_minutes, buffer);
                prop_assert!(buffer >= min_buffer);
                prop_assert_eq!(minutes_from_midnight(option.total_arrival), arrival);
                prop_assert_eq!(option.total_arrival, option.second.arrival);

                for candidate in tt.schedules_for(bc) {
                    let (buffer, arrival) =
                        expected_timing(first_arrival, candidate.departure, candidate.arrival);
                    if buffer >= min_buffer {
                        prop_assert!(arrival >= minutes_from_midnight(option.total_arrival));
                    }
                }
            }
        }

        /// Every first leg with at least one feasible second leg yields an
        /// itinerary.
        #[test]
        fn every_connectable_first_leg_is_offered(
            firsts in leg_times(),
            seconds in leg_times(),
            min_buffer in 0i64..180,
        ) {
            let (tt, a, c, ab, bc) = triangle(&firsts, &seconds);
            let min = Duration::minutes(min_buffer);
            let options = find_connecting(&tt, a, c, monday(), SeatClass::Sleeper, min);

            for first in tt.schedules_for(ab) {
                let connectable = tt.schedules_for(bc).iter().any(|second| {
                    let (buffer, _) =
                        expected_timing(first.arrival, second.departure, second.arrival);
                    buffer >= min_buffer
                });
                let offered = options.iter().filter(|o| o.first.schedule.id == first.id).count();
                prop_assert_eq!(offered, usize::from(connectable));
            }
        }
    }
}
