//! Web layer for the rail booking server.
//!
//! Provides JSON endpoints for itinerary search and bookings.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
