//! Domain error types.
//!
//! These errors represent validation failures of individual domain values.
//! They are distinct from lookup, ledger and API errors.

use super::{
    InvalidCalendar, InvalidMoney, InvalidPnr, InvalidSeatNumber, InvalidStationCode,
    InvalidTrainNumber, TimeError,
};

/// A domain value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    StationCode(#[from] InvalidStationCode),

    #[error(transparent)]
    TrainNumber(#[from] InvalidTrainNumber),

    #[error(transparent)]
    Calendar(#[from] InvalidCalendar),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Money(#[from] InvalidMoney),

    #[error(transparent)]
    SeatNumber(#[from] InvalidSeatNumber),

    #[error(transparent)]
    Pnr(#[from] InvalidPnr),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, Pnr, ServiceDays, StationCode, parse_hhmm};

    #[test]
    fn error_display() {
        let err: DomainError = StationCode::parse("m-s").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "invalid station code: must be uppercase ASCII letters or digits"
        );

        let err: DomainError = ServiceDays::parse("00").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "invalid service calendar \"00\": duplicate weekday"
        );

        let err: DomainError = parse_hhmm("25:00").unwrap_err().into();
        assert_eq!(err.to_string(), "invalid time: hour must be 0-23");

        let err: DomainError = Money::parse("1.234").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "invalid amount \"1.234\": at most two decimal places"
        );

        let err: DomainError = Pnr::parse("short").unwrap_err().into();
        assert_eq!(err.to_string(), "invalid PNR: must be exactly 10 characters");
    }
}
