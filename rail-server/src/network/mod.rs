//! In-memory network store.
//!
//! Holds every station, train, route and schedule, plus the availability
//! ledger for the schedules. A [`Network`] is assembled once through
//! [`NetworkBuilder`], which rejects records that would break an invariant,
//! and is read-only afterwards except for seat counters.

mod error;
mod seed;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveTime;

use crate::domain::{
    ClassCapacity, GeoPoint, Money, Route, RouteId, Schedule, ScheduleId, ServiceDays, Station,
    StationCode, StationId, Train, TrainId, TrainNumber, TrainType, TravelDuration, format_hhmm,
};
use crate::ledger::AvailabilityLedger;

pub use error::NetworkError;
pub use seed::{
    LoadError, NetworkSeed, RouteSeed, ScheduleSeed, StationSeed, TrainSeed, load_network,
};

/// Fields of a station to be added.
#[derive(Debug, Clone)]
pub struct NewStation {
    pub code: StationCode,
    pub name: String,
    pub city: String,
    pub state: String,
    pub location: Option<GeoPoint>,
}

/// Fields of a train to be added.
#[derive(Debug, Clone)]
pub struct NewTrain {
    pub number: TrainNumber,
    pub name: String,
    pub train_type: TrainType,
    pub operator: String,
    pub total_coaches: u32,
    pub seats_per_coach: u32,
    pub capacity: ClassCapacity,
    pub is_active: bool,
}

/// Fields of a route to be added.
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub train: TrainId,
    pub source: StationId,
    pub destination: StationId,
    pub distance_km: u32,
    pub duration: TravelDuration,
    pub fare_per_km: Money,
    pub is_active: bool,
}

/// Fields of a schedule to be added.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub route: RouteId,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub runs_on: ServiceDays,
    pub is_active: bool,
    /// Starting seat counts; the train's capacity when absent.
    pub initial_availability: Option<ClassCapacity>,
}

/// Stations, trains, routes and schedules with their seat counters.
///
/// Identifiers are assigned sequentially from 1 in insertion order.
#[derive(Debug, Default)]
pub struct Network {
    stations: Vec<Arc<Station>>,
    station_codes: HashMap<StationCode, StationId>,
    trains: Vec<Arc<Train>>,
    routes: Vec<Arc<Route>>,
    routes_from: HashMap<StationId, Vec<RouteId>>,
    schedules: Vec<Arc<Schedule>>,
    schedules_by_route: HashMap<RouteId, Vec<ScheduleId>>,
    ledger: AvailabilityLedger,
}

fn slot<T>(items: &[T], id: u32) -> Option<&T> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    items.get(index)
}

fn next_id(len: usize) -> u32 {
    u32::try_from(len + 1).unwrap_or(u32::MAX)
}

impl Network {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn station(&self, id: StationId) -> Option<&Arc<Station>> {
        slot(&self.stations, id.0)
    }

    pub fn station_by_code(&self, code: &StationCode) -> Option<&Arc<Station>> {
        self.station_codes
            .get(code)
            .and_then(|id| self.station(*id))
    }

    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    pub fn train(&self, id: TrainId) -> Option<&Arc<Train>> {
        slot(&self.trains, id.0)
    }

    pub fn trains(&self) -> &[Arc<Train>] {
        &self.trains
    }

    pub fn route(&self, id: RouteId) -> Option<&Arc<Route>> {
        slot(&self.routes, id.0)
    }

    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    pub fn schedule(&self, id: ScheduleId) -> Option<&Arc<Schedule>> {
        slot(&self.schedules, id.0)
    }

    pub fn schedules(&self) -> &[Arc<Schedule>] {
        &self.schedules
    }

    /// Routes leaving a station, in insertion order.
    pub fn routes_from(&self, station: StationId) -> impl Iterator<Item = &Arc<Route>> + '_ {
        self.routes_from
            .get(&station)
            .into_iter()
            .flatten()
            .filter_map(|id| self.route(*id))
    }

    /// Schedules of a route, ordered by departure time.
    pub fn schedules_for(&self, route: RouteId) -> impl Iterator<Item = &Arc<Schedule>> + '_ {
        self.schedules_by_route
            .get(&route)
            .into_iter()
            .flatten()
            .filter_map(|id| self.schedule(*id))
    }

    /// The train that runs a schedule.
    pub fn train_for_schedule(&self, schedule: &Schedule) -> Option<&Arc<Train>> {
        self.route(schedule.route)
            .and_then(|route| self.train(route.train))
    }

    pub fn ledger(&self) -> &AvailabilityLedger {
        &self.ledger
    }

    /// Stations whose name or code contains `query`, ordered by name.
    ///
    /// A blank query matches nothing.
    pub fn search_stations(&self, query: &str, limit: usize) -> Vec<Arc<Station>> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<_> = self
            .stations
            .iter()
            .filter(|s| s.matches(query))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(limit);
        matches
    }
}

/// Assembles a [`Network`], checking each record as it is added.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    network: Network,
    station_names: HashSet<String>,
    train_numbers: HashMap<TrainNumber, TrainId>,
    route_keys: HashMap<(TrainId, StationId, StationId), RouteId>,
    schedule_keys: HashSet<(RouteId, NaiveTime)>,
}

impl NetworkBuilder {
    pub fn add_station(&mut self, new: NewStation) -> Result<StationId, NetworkError> {
        if new.name.trim().is_empty() {
            return Err(NetworkError::InvalidStation {
                reason: "name must not be empty",
            });
        }
        if self.network.station_codes.contains_key(&new.code) {
            return Err(NetworkError::DuplicateStationCode(new.code));
        }
        if !self.station_names.insert(new.name.clone()) {
            return Err(NetworkError::DuplicateStationName(new.name));
        }

        let id = StationId(next_id(self.network.stations.len()));
        self.network.station_codes.insert(new.code.clone(), id);
        self.network.stations.push(Arc::new(Station {
            id,
            code: new.code,
            name: new.name,
            city: new.city,
            state: new.state,
            location: new.location,
        }));
        Ok(id)
    }

    pub fn add_train(&mut self, new: NewTrain) -> Result<TrainId, NetworkError> {
        if self.train_numbers.contains_key(&new.number) {
            return Err(NetworkError::DuplicateTrainNumber(new.number));
        }

        let id = TrainId(next_id(self.network.trains.len()));
        self.train_numbers.insert(new.number.clone(), id);
        self.network.trains.push(Arc::new(Train {
            id,
            number: new.number,
            name: new.name,
            train_type: new.train_type,
            operator: new.operator,
            total_coaches: new.total_coaches,
            seats_per_coach: new.seats_per_coach,
            capacity: new.capacity,
            is_active: new.is_active,
        }));
        Ok(id)
    }

    pub fn add_route(&mut self, new: NewRoute) -> Result<RouteId, NetworkError> {
        if self.network.train(new.train).is_none() {
            return Err(NetworkError::UnknownTrain(new.train));
        }
        for station in [new.source, new.destination] {
            if self.network.station(station).is_none() {
                return Err(NetworkError::UnknownStation(station));
            }
        }
        if new.source == new.destination {
            return Err(NetworkError::SameEndpoints(new.source));
        }
        if new.distance_km == 0 {
            return Err(NetworkError::InvalidRoute {
                reason: "distance must be at least 1 km",
            });
        }
        if new.duration.minutes > 59 {
            return Err(NetworkError::InvalidRoute {
                reason: "duration minutes must be below 60",
            });
        }

        let key = (new.train, new.source, new.destination);
        if self.route_keys.contains_key(&key) {
            return Err(NetworkError::DuplicateRoute {
                train: new.train,
                origin: new.source,
                destination: new.destination,
            });
        }

        let id = RouteId(next_id(self.network.routes.len()));
        self.route_keys.insert(key, id);
        self.network
            .routes_from
            .entry(new.source)
            .or_default()
            .push(id);
        self.network.routes.push(Arc::new(Route {
            id,
            train: new.train,
            source: new.source,
            destination: new.destination,
            distance_km: new.distance_km,
            duration: new.duration,
            fare_per_km: new.fare_per_km,
            is_active: new.is_active,
        }));
        Ok(id)
    }

    pub fn add_schedule(&mut self, new: NewSchedule) -> Result<ScheduleId, NetworkError> {
        let route = self
            .network
            .route(new.route)
            .ok_or(NetworkError::UnknownRoute(new.route))?;
        let capacity = self
            .network
            .train(route.train)
            .map(|t| t.capacity)
            .ok_or(NetworkError::UnknownTrain(route.train))?;

        if !self.schedule_keys.insert((new.route, new.departure)) {
            return Err(NetworkError::DuplicateSchedule {
                route: new.route,
                departure: format_hhmm(new.departure),
            });
        }

        let id = ScheduleId(next_id(self.network.schedules.len()));
        self.network.ledger.register(
            id,
            capacity,
            new.initial_availability.unwrap_or(capacity),
        );
        self.network
            .schedules_by_route
            .entry(new.route)
            .or_default()
            .push(id);
        self.network.schedules.push(Arc::new(Schedule {
            id,
            route: new.route,
            departure: new.departure,
            arrival: new.arrival,
            runs_on: new.runs_on,
            is_active: new.is_active,
        }));
        Ok(id)
    }

    /// Look up a train added earlier by its number.
    pub fn train_id(&self, number: &TrainNumber) -> Option<TrainId> {
        self.train_numbers.get(number).copied()
    }

    /// Look up a station added earlier by its code.
    pub fn station_id(&self, code: &StationCode) -> Option<StationId> {
        self.network.station_codes.get(code).copied()
    }

    /// Look up a route added earlier by its train and endpoints.
    pub fn route_id(
        &self,
        train: TrainId,
        source: StationId,
        destination: StationId,
    ) -> Option<RouteId> {
        self.route_keys.get(&(train, source, destination)).copied()
    }

    pub fn build(mut self) -> Network {
        let schedules = &self.network.schedules;
        for ids in self.network.schedules_by_route.values_mut() {
            ids.sort_by_key(|id| {
                slot(schedules, id.0).map(|s| (s.departure, s.id))
            });
        }
        self.network
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small hand-built networks shared by tests across the crate.

    use super::*;
    use crate::domain::parse_hhmm;

    pub fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    pub fn time(s: &str) -> NaiveTime {
        parse_hhmm(s).unwrap()
    }

    pub fn capacity() -> ClassCapacity {
        ClassCapacity {
            ac_first: 24,
            ac_two_tier: 48,
            ac_three_tier: 144,
            sleeper: 576,
            general: 288,
        }
    }

    pub fn station(builder: &mut NetworkBuilder, code_str: &str, name: &str) -> StationId {
        builder
            .add_station(NewStation {
                code: code(code_str),
                name: name.to_string(),
                city: name.to_string(),
                state: "State".to_string(),
                location: None,
            })
            .unwrap()
    }

    pub fn train(builder: &mut NetworkBuilder, number: &str, name: &str) -> TrainId {
        builder
            .add_train(NewTrain {
                number: TrainNumber::parse(number).unwrap(),
                name: name.to_string(),
                train_type: TrainType::Express,
                operator: "Indian Railways".to_string(),
                total_coaches: 22,
                seats_per_coach: 72,
                capacity: capacity(),
                is_active: true,
            })
            .unwrap()
    }

    pub fn route(
        builder: &mut NetworkBuilder,
        train: TrainId,
        source: StationId,
        destination: StationId,
        distance_km: u32,
        fare_per_km: &str,
    ) -> RouteId {
        builder
            .add_route(NewRoute {
                train,
                source,
                destination,
                distance_km,
                duration: TravelDuration {
                    hours: 29,
                    minutes: 45,
                },
                fare_per_km: Money::parse(fare_per_km).unwrap(),
                is_active: true,
            })
            .unwrap()
    }

    pub fn schedule(
        builder: &mut NetworkBuilder,
        route: RouteId,
        departure: &str,
        arrival: &str,
        runs_on: &str,
    ) -> ScheduleId {
        builder
            .add_schedule(NewSchedule {
                route,
                departure: time(departure),
                arrival: time(arrival),
                runs_on: ServiceDays::parse(runs_on).unwrap(),
                is_active: true,
                initial_availability: None,
            })
            .unwrap()
    }
}
