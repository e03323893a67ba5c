//! Ordering of connecting itineraries.

use super::ConnectingOption;

/// Sort connecting itineraries by arrival at the destination, earliest first.
///
/// The sort is stable: itineraries arriving at the same instant keep the
/// order they were found in.
pub fn rank_connections(mut options: Vec<ConnectingOption>) -> Vec<ConnectingOption> {
    options.sort_by_key(|o| o.total_arrival);
    options
}
