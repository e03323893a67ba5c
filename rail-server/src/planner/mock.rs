//! In-memory timetable for planner tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::Timetable;
use crate::domain::{
    Money, Route, RouteId, Schedule, ScheduleId, SeatClass, ServiceDays, Station, StationCode,
    StationId, TrainId, TravelDuration, parse_hhmm,
};

/// Seats given to every class of a new schedule.
pub const DEFAULT_SEATS: u32 = 10;

/// 2024-03-18 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
}

#[derive(Debug, Default)]
pub struct MockTimetable {
    stations: Vec<Arc<Station>>,
    routes: Vec<Arc<Route>>,
    schedules: Vec<Arc<Schedule>>,
    seats: HashMap<(ScheduleId, SeatClass), u32>,
}

impl MockTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_station(&mut self, code: &str) -> StationId {
        let id = StationId(self.stations.len() as u32 + 1);
        self.stations.push(Arc::new(Station {
            id,
            code: StationCode::parse(code).unwrap(),
            name: format!("{code} Junction"),
            city: code.to_string(),
            state: "Test".to_string(),
            location: None,
        }));
        id
    }

    pub fn route(
        &mut self,
        source: StationId,
        destination: StationId,
        distance_km: u32,
        fare_per_km: &str,
    ) -> RouteId {
        let id = RouteId(self.routes.len() as u32 + 1);
        self.routes.push(Arc::new(Route {
            id,
            train: TrainId(id.0),
            source,
            destination,
            distance_km,
            duration: TravelDuration {
                hours: 1,
                minutes: 0,
            },
            fare_per_km: Money::parse(fare_per_km).unwrap(),
            is_active: true,
        }));
        id
    }

    pub fn schedule(
        &mut self,
        route: RouteId,
        departure: &str,
        arrival: &str,
        runs_on: &str,
    ) -> ScheduleId {
        let id = ScheduleId(self.schedules.len() as u32 + 1);
        self.schedules.push(Arc::new(Schedule {
            id,
            route,
            departure: parse_hhmm(departure).unwrap(),
            arrival: parse_hhmm(arrival).unwrap(),
            runs_on: ServiceDays::parse(runs_on).unwrap(),
            is_active: true,
        }));
        for class in SeatClass::ALL {
            self.seats.insert((id, class), DEFAULT_SEATS);
        }
        id
    }

    /// A daily schedule.
    pub fn daily(&mut self, route: RouteId, departure: &str, arrival: &str) -> ScheduleId {
        self.schedule(route, departure, arrival, "0123456")
    }

    pub fn set_seats(&mut self, schedule: ScheduleId, class: SeatClass, seats: u32) {
        self.seats.insert((schedule, class), seats);
    }

    pub fn deactivate_route(&mut self, id: RouteId) {
        if let Some(route) = self.routes.iter_mut().find(|r| r.id == id) {
            Arc::make_mut(route).is_active = false;
        }
    }

    pub fn deactivate_schedule(&mut self, id: ScheduleId) {
        if let Some(schedule) = self.schedules.iter_mut().find(|s| s.id == id) {
            Arc::make_mut(schedule).is_active = false;
        }
    }
}

impl Timetable for MockTimetable {
    fn station(&self, id: StationId) -> Option<Arc<Station>> {
        self.stations.iter().find(|s| s.id == id).cloned()
    }

    fn routes_from(&self, station: StationId) -> Vec<Arc<Route>> {
        self.routes
            .iter()
            .filter(|r| r.source == station)
            .cloned()
            .collect()
    }

    fn schedules_for(&self, route: RouteId) -> Vec<Arc<Schedule>> {
        let mut schedules: Vec<_> = self
            .schedules
            .iter()
            .filter(|s| s.route == route)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| (s.departure, s.id));
        schedules
    }

    fn available(&self, schedule: ScheduleId, class: SeatClass) -> u32 {
        self.seats.get(&(schedule, class)).copied().unwrap_or(0)
    }
}
