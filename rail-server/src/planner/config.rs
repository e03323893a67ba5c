//! Search configuration for the itinerary planner.

use chrono::Duration;

/// Default minimum gap between arriving on one train and boarding the next.
pub const DEFAULT_MIN_CONNECTION_MINS: i64 = 30;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Minimum time required for a connection (minutes).
    /// Connections tighter than this are rejected.
    pub min_connection_mins: i64,

    /// Only offer connecting itineraries to privileged callers.
    /// Direct search always runs.
    pub connections_require_auth: bool,
}

impl SearchConfig {
    pub fn new(min_connection_mins: i64, connections_require_auth: bool) -> Self {
        Self {
            min_connection_mins,
            connections_require_auth,
        }
    }

    /// Returns the minimum connection time as a Duration.
    pub fn min_connection(&self) -> Duration {
        Duration::minutes(self.min_connection_mins)
    }

    /// Whether a caller may be offered connecting itineraries.
    pub fn allows_connections(&self, caller_is_privileged: bool) -> bool {
        caller_is_privileged || !self.connections_require_auth
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_connection_mins: DEFAULT_MIN_CONNECTION_MINS,
            connections_require_auth: true,
        }
    }
}
