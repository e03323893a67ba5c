//! Domain types for the rail booking server.
//!
//! This module contains the core domain model types that represent
//! validated network and booking data. All types enforce their invariants
//! at construction time, so code that receives these types can trust their
//! validity.

mod booking;
mod calendar;
mod error;
mod ids;
mod money;
mod route;
mod schedule;
mod seat;
mod station;
mod time;
mod train;

pub use booking::{
    Booking, BookingLeg, BookingStatus, Caller, Gender, InvalidPnr, Passenger, Pnr, UserId,
};
pub use calendar::{InvalidCalendar, ServiceDays};
pub use error::DomainError;
pub use ids::{RouteId, ScheduleId, StationId, TrainId};
pub use money::{InvalidMoney, Money};
pub use route::{Route, TravelDuration};
pub use schedule::Schedule;
pub use seat::{ClassCapacity, InvalidSeatNumber, SeatClass, SeatNumber};
pub use station::{GeoPoint, InvalidStationCode, Station, StationCode};
pub use time::{
    TimeError, anchor, arrival_after, format_hhmm, hhmm, minutes_between, next_after, parse_hhmm,
};
pub use train::{InvalidTrainNumber, Train, TrainNumber, TrainType};
