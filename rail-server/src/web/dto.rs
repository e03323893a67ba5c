//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Money, Passenger, Route, Schedule, SeatClass, Station, StationId, format_hhmm,
};
use crate::network::Network;
use crate::planner::{ConnectingOption, DirectOption, LegOption};

/// Query for station autocomplete.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Search query (code or part of the name)
    pub q: String,

    /// Maximum results (default 10)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StationSearchResult {
    pub code: String,
    pub name: String,
    pub city: String,
}

impl StationSearchResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            code: station.code.to_string(),
            name: station.name.clone(),
            city: station.city.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationSearchResult>,
}

/// A station named by numeric id or by code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StationRef {
    Id(u32),
    Code(String),
}

/// Request to search for itineraries.
#[derive(Debug, Deserialize)]
pub struct SearchItinerariesRequest {
    /// Origin station id or code
    pub source: StationRef,

    /// Destination station id or code
    pub destination: StationRef,

    /// `YYYY-MM-DD`
    pub journey_date: NaiveDate,

    pub seat_class: SeatClass,
}

/// The train and stations a run serves, resolved for display.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub schedule_id: u32,
    pub route_id: u32,
    pub train_number: String,
    pub train_name: String,
    pub source: String,
    pub destination: String,
}

impl RunResult {
    fn resolve(network: &Network, route: &Route, schedule: &Schedule) -> Self {
        let train = network.train(route.train);
        Self {
            schedule_id: schedule.id.0,
            route_id: route.id.0,
            train_number: train.map(|t| t.number.to_string()).unwrap_or_default(),
            train_name: train.map(|t| t.name.clone()).unwrap_or_default(),
            source: station_code(network, route.source),
            destination: station_code(network, route.destination),
        }
    }
}

fn station_code(network: &Network, id: StationId) -> String {
    network
        .station(id)
        .map(|s| s.code.to_string())
        .unwrap_or_default()
}

/// A single train from source to destination.
#[derive(Debug, Serialize)]
pub struct DirectResult {
    #[serde(flatten)]
    pub run: RunResult,

    /// `HH:MM`
    pub departure: String,

    /// `HH:MM`, possibly on a later day
    pub arrival: String,

    /// e.g. "29h 45m"
    pub duration: String,
    pub distance_km: u32,
    pub fare: Money,
    pub available_seats: u32,
}

impl DirectResult {
    pub fn from_option(network: &Network, option: &DirectOption) -> Self {
        Self {
            run: RunResult::resolve(network, &option.route, &option.schedule),
            departure: format_hhmm(option.schedule.departure),
            arrival: format_hhmm(option.schedule.arrival),
            duration: option.duration.to_string(),
            distance_km: option.route.distance_km,
            fare: option.fare,
            available_seats: option.available_seats,
        }
    }
}

/// One leg of a connecting itinerary.
#[derive(Debug, Serialize)]
pub struct LegResult {
    #[serde(flatten)]
    pub run: RunResult,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub fare: Money,
    pub available_seats: u32,
}

impl LegResult {
    fn from_leg(network: &Network, leg: &LegOption) -> Self {
        Self {
            run: RunResult::resolve(network, &leg.route, &leg.schedule),
            departure: leg.departure,
            arrival: leg.arrival,
            fare: leg.route.fare(),
            available_seats: leg.available_seats,
        }
    }
}

/// Two trains with a change at an intermediate station.
#[derive(Debug, Serialize)]
pub struct ConnectingResult {
    pub first: LegResult,
    pub second: LegResult,

    /// Code of the station where passengers change
    pub via: String,
    pub buffer_minutes: i64,
    pub total_fare: Money,
    pub total_distance_km: u32,
    pub arrival: NaiveDateTime,
}

impl ConnectingResult {
    pub fn from_option(network: &Network, option: &ConnectingOption) -> Self {
        Self {
            first: LegResult::from_leg(network, &option.first),
            second: LegResult::from_leg(network, &option.second),
            via: station_code(network, option.intermediate()),
            buffer_minutes: option.buffer_minutes,
            total_fare: option.total_fare,
            total_distance_km: option.total_distance_km,
            arrival: option.total_arrival,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchItinerariesResponse {
    pub direct: Vec<DirectResult>,
    pub connecting: Vec<ConnectingResult>,

    /// False when the caller was not offered connections
    pub connections_searched: bool,
}

/// A seat on one schedule.
#[derive(Debug, Deserialize)]
pub struct LegRequest {
    pub schedule_id: u32,
    pub seat_number: String,
}

/// Request to commit a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub passenger: Passenger,
    pub seat_class: SeatClass,
    pub journey_date: NaiveDate,
    pub legs: Vec<LegRequest>,

    /// The total shown to the passenger, as a decimal string
    pub expected_total_fare: Option<Money>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
