//! Network construction errors.

use crate::domain::{RouteId, StationCode, StationId, TrainId, TrainNumber};

/// A record that would break a network invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("station code {0} is already in use")]
    DuplicateStationCode(StationCode),

    #[error("station name {0:?} is already in use")]
    DuplicateStationName(String),

    #[error("train number {0} is already in use")]
    DuplicateTrainNumber(TrainNumber),

    #[error("train {train} already has a route from {origin} to {destination}")]
    DuplicateRoute {
        train: TrainId,
        origin: StationId,
        destination: StationId,
    },

    #[error("route {route} already has a departure at {departure}")]
    DuplicateSchedule { route: RouteId, departure: String },

    #[error("unknown station {0}")]
    UnknownStation(StationId),

    #[error("unknown train {0}")]
    UnknownTrain(TrainId),

    #[error("unknown route {0}")]
    UnknownRoute(RouteId),

    #[error("route starts and ends at station {0}")]
    SameEndpoints(StationId),

    #[error("invalid route: {reason}")]
    InvalidRoute { reason: &'static str },

    #[error("invalid station: {reason}")]
    InvalidStation { reason: &'static str },
}
