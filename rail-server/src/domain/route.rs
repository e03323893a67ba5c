//! Routes: directed train services between two stations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Money, RouteId, StationId, TrainId};

/// Scheduled running time of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl TravelDuration {
    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for TravelDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// A train running from `source` to `destination`.
///
/// At most one route exists per (train, source, destination).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub train: TrainId,
    pub source: StationId,
    pub destination: StationId,
    pub distance_km: u32,
    pub duration: TravelDuration,
    pub fare_per_km: Money,
    pub is_active: bool,
}

impl Route {
    /// Fare for the full route: rate per km times distance.
    pub fn fare(&self) -> Money {
        self.fare_per_km * self.distance_km
    }
}
