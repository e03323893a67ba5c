//! Booking errors.

use crate::domain::{Pnr, ScheduleId, SeatClass};
use crate::ledger::LedgerError;

/// Why a booking operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// A referenced booking, schedule or route does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The request is malformed or not allowed in the booking's state
    #[error("invalid booking: {0}")]
    Validation(String),

    /// Seats ran out between search and commit
    #[error("no {class} seats left on schedule {schedule}")]
    AvailabilityExhausted {
        schedule: ScheduleId,
        class: SeatClass,
    },

    /// The caller neither owns the booking nor is staff
    #[error("not allowed to manage booking {0}")]
    Unauthorized(Pnr),
}

impl BookingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }
}

impl From<LedgerError> for BookingError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownSchedule(id) => BookingError::NotFound(format!("schedule {id}")),
            LedgerError::Exhausted {
                schedule, class, ..
            } => BookingError::AvailabilityExhausted { schedule, class },
        }
    }
}
