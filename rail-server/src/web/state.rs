//! Application state for the web layer.

use std::sync::Arc;

use crate::booking::{BookingService, NotificationChannel};
use crate::network::Network;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Stations, trains, routes, schedules and seat counters
    pub network: Arc<Network>,

    /// Booking commit and cancellation
    pub bookings: Arc<BookingService>,

    /// Itinerary search configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(network: Network, notifier: NotificationChannel, config: SearchConfig) -> Self {
        let network = Arc::new(network);
        Self {
            bookings: Arc::new(BookingService::new(Arc::clone(&network), notifier)),
            network,
            config: Arc::new(config),
        }
    }
}
