//! Read access to the timetable for the planner.

use std::sync::Arc;

use crate::domain::{Route, RouteId, Schedule, ScheduleId, SeatClass, Station, StationId};
use crate::network::Network;

/// Source of routes, schedules and live seat counts.
///
/// This abstraction allows the planner to be tested with mock data.
pub trait Timetable {
    fn station(&self, id: StationId) -> Option<Arc<Station>>;

    /// Routes leaving `station`, in a stable order.
    fn routes_from(&self, station: StationId) -> Vec<Arc<Route>>;

    /// Schedules of `route`, ordered by departure time.
    fn schedules_for(&self, route: RouteId) -> Vec<Arc<Schedule>>;

    /// Seats currently free; 0 when unknown.
    fn available(&self, schedule: ScheduleId, class: SeatClass) -> u32;
}

impl Timetable for Network {
    fn station(&self, id: StationId) -> Option<Arc<Station>> {
        Network::station(self, id).cloned()
    }

    fn routes_from(&self, station: StationId) -> Vec<Arc<Route>> {
        Network::routes_from(self, station).cloned().collect()
    }

    fn schedules_for(&self, route: RouteId) -> Vec<Arc<Schedule>> {
        Network::schedules_for(self, route).cloned().collect()
    }

    fn available(&self, schedule: ScheduleId, class: SeatClass) -> u32 {
        self.ledger().get_available(schedule, class)
    }
}
