//! Loading a network from a JSON seed file.
//!
//! Seed records refer to each other by natural keys (station codes, train
//! numbers) rather than identifiers, so a file can be written by hand.
//! Every value is validated while the network is built; the first bad
//! record aborts the load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    ClassCapacity, DomainError, GeoPoint, Money, ServiceDays, StationCode, StationId, TrainNumber,
    TrainType, TravelDuration, parse_hhmm,
};

use super::{
    Network, NetworkBuilder, NetworkError, NewRoute, NewSchedule, NewStation, NewTrain,
};

/// Errors from loading a network seed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed network file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Invalid {
        context: String,
        #[source]
        source: DomainError,
    },

    #[error("{context}: unknown {kind} {key}")]
    UnknownReference {
        context: String,
        kind: &'static str,
        key: String,
    },

    #[error("{context}: {source}")]
    Network {
        context: String,
        #[source]
        source: NetworkError,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSeed {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSeed {
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub train_type: TrainType,
    #[serde(default)]
    pub operator: String,
    pub total_coaches: u32,
    pub seats_per_coach: u32,
    pub capacity: ClassCapacity,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSeed {
    pub train: String,
    pub source: String,
    pub destination: String,
    pub distance_km: u32,
    pub duration_hours: u32,
    pub duration_minutes: u32,
    /// Decimal rupees per km, e.g. `"0.50"`.
    pub fare_per_km: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A schedule, naming its route by train number and endpoint codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSeed {
    pub train: String,
    pub source: String,
    pub destination: String,
    /// `HH:MM`
    pub departure: String,
    /// `HH:MM`; at or before `departure` means the next day.
    pub arrival: String,
    /// Weekday digits, `0` for Monday through `6` for Sunday.
    pub runs_on: String,
    #[serde(default)]
    pub available: Option<ClassCapacity>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// The contents of a network seed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSeed {
    #[serde(default)]
    pub stations: Vec<StationSeed>,
    #[serde(default)]
    pub trains: Vec<TrainSeed>,
    #[serde(default)]
    pub routes: Vec<RouteSeed>,
    #[serde(default)]
    pub schedules: Vec<ScheduleSeed>,
}

fn invalid<E: Into<DomainError>>(context: &str) -> impl FnOnce(E) -> LoadError + '_ {
    move |err| LoadError::Invalid {
        context: context.to_string(),
        source: err.into(),
    }
}

fn rejected(context: &str) -> impl FnOnce(NetworkError) -> LoadError + '_ {
    move |source| LoadError::Network {
        context: context.to_string(),
        source,
    }
}

fn station_ref(
    builder: &NetworkBuilder,
    context: &str,
    raw: &str,
) -> Result<StationId, LoadError> {
    let code = StationCode::parse_normalized(raw).map_err(invalid(context))?;
    builder
        .station_id(&code)
        .ok_or_else(|| LoadError::UnknownReference {
            context: context.to_string(),
            kind: "station",
            key: code.to_string(),
        })
}

fn route_ref(
    builder: &NetworkBuilder,
    context: &str,
    train: &str,
    source: &str,
    destination: &str,
) -> Result<crate::domain::RouteId, LoadError> {
    let number = TrainNumber::parse(train).map_err(invalid(context))?;
    let train_id = builder
        .train_id(&number)
        .ok_or_else(|| LoadError::UnknownReference {
            context: context.to_string(),
            kind: "train",
            key: number.to_string(),
        })?;
    let source = station_ref(builder, context, source)?;
    let destination = station_ref(builder, context, destination)?;

    builder
        .route_id(train_id, source, destination)
        .ok_or_else(|| LoadError::UnknownReference {
            context: context.to_string(),
            kind: "route",
            key: format!("{number} {source}->{destination}"),
        })
}

impl NetworkSeed {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Build and validate the network described by this seed.
    pub fn into_network(self) -> Result<Network, LoadError> {
        let mut builder = Network::builder();

        for seed in self.stations {
            let context = format!("station {}", seed.code);
            let code = StationCode::parse_normalized(&seed.code).map_err(invalid(&context))?;
            let location = match (seed.latitude, seed.longitude) {
                (Some(latitude), Some(longitude)) => Some(GeoPoint {
                    latitude,
                    longitude,
                }),
                _ => None,
            };
            builder
                .add_station(NewStation {
                    code,
                    name: seed.name,
                    city: seed.city,
                    state: seed.state,
                    location,
                })
                .map_err(rejected(&context))?;
        }

        for seed in self.trains {
            let context = format!("train {}", seed.number);
            let number = TrainNumber::parse(&seed.number).map_err(invalid(&context))?;
            builder
                .add_train(NewTrain {
                    number,
                    name: seed.name,
                    train_type: seed.train_type,
                    operator: seed.operator,
                    total_coaches: seed.total_coaches,
                    seats_per_coach: seed.seats_per_coach,
                    capacity: seed.capacity,
                    is_active: seed.is_active,
                })
                .map_err(rejected(&context))?;
        }

        for seed in self.routes {
            let context = format!(
                "route {} {}->{}",
                seed.train, seed.source, seed.destination
            );
            let number = TrainNumber::parse(&seed.train).map_err(invalid(&context))?;
            let train = builder
                .train_id(&number)
                .ok_or_else(|| LoadError::UnknownReference {
                    context: context.clone(),
                    kind: "train",
                    key: number.to_string(),
                })?;
            let source = station_ref(&builder, &context, &seed.source)?;
            let destination = station_ref(&builder, &context, &seed.destination)?;
            let fare_per_km = Money::parse(&seed.fare_per_km).map_err(invalid(&context))?;

            builder
                .add_route(NewRoute {
                    train,
                    source,
                    destination,
                    distance_km: seed.distance_km,
                    duration: TravelDuration {
                        hours: seed.duration_hours,
                        minutes: seed.duration_minutes,
                    },
                    fare_per_km,
                    is_active: seed.is_active,
                })
                .map_err(rejected(&context))?;
        }

        for seed in self.schedules {
            let context = format!(
                "schedule {} {}->{} at {}",
                seed.train, seed.source, seed.destination, seed.departure
            );
            let route = route_ref(
                &builder,
                &context,
                &seed.train,
                &seed.source,
                &seed.destination,
            )?;
            let departure = parse_hhmm(&seed.departure).map_err(invalid(&context))?;
            let arrival = parse_hhmm(&seed.arrival).map_err(invalid(&context))?;
            let runs_on = ServiceDays::parse(&seed.runs_on).map_err(invalid(&context))?;

            builder
                .add_schedule(NewSchedule {
                    route,
                    departure,
                    arrival,
                    runs_on,
                    is_active: seed.is_active,
                    initial_availability: seed.available,
                })
                .map_err(rejected(&context))?;
        }

        Ok(builder.build())
    }
}

/// Read, validate and build the network in a seed file.
pub fn load_network(path: impl AsRef<Path>) -> Result<Network, LoadError> {
    let path = path.as_ref();
    let network = NetworkSeed::from_file(path)?.into_network()?;

    info!(
        path = %path.display(),
        stations = network.stations().len(),
        trains = network.trains().len(),
        routes = network.routes().len(),
        schedules = network.schedules().len(),
        "loaded network"
    );

    Ok(network)
}
