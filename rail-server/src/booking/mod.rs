//! Booking commit, cancellation and the records they produce.

mod error;
mod notify;
mod service;
mod store;
mod summary;
mod ticket;

pub use error::BookingError;
pub use notify::{
    Confirmation, LogNotifier, NotificationChannel, Notifier, NotifyError, WebhookConfig,
    WebhookNotifier,
};
pub use service::{BookingRequest, BookingService, LegSelection};
pub use store::BookingStore;
pub use summary::{AdminSummary, RouteUsage};
pub use ticket::{Ticket, TicketLeg};
