//! Itinerary planner.
//!
//! Answers "how can I get from this station to that one on this date, in
//! this class?" with direct runs and, for privileged callers, two-train
//! connections through one intermediate station.

mod config;
mod connecting;
mod direct;
#[cfg(test)]
pub(crate) mod mock;
mod rank;
mod search;
mod timetable;

pub use config::{DEFAULT_MIN_CONNECTION_MINS, SearchConfig};
pub use connecting::{ConnectingOption, LegOption, find_connecting};
pub use direct::{DirectOption, find_direct};
pub use rank::rank_connections;
pub use search::{Planner, SearchError, SearchRequest, SearchResult};
pub use timetable::Timetable;
