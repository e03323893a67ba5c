//! Bookings, their legs, and the people who make them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Money, RouteId, ScheduleId, SeatClass, SeatNumber};

const PNR_LEN: usize = 10;
const PNR_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Error returned when parsing an invalid PNR.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid PNR: {reason}")]
pub struct InvalidPnr {
    reason: &'static str,
}

/// Passenger Name Record: 10 uppercase letters or digits.
///
/// # Examples
///
/// ```
/// use rail_server::domain::Pnr;
///
/// let pnr = Pnr::generate(&mut rand::thread_rng());
/// assert_eq!(pnr.as_str().len(), 10);
/// assert_eq!(Pnr::parse(pnr.as_str()).unwrap(), pnr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pnr(String);

impl Pnr {
    /// Parse a PNR, accepting lowercase input.
    pub fn parse(s: &str) -> Result<Self, InvalidPnr> {
        let s = s.trim().to_ascii_uppercase();
        if s.len() != PNR_LEN {
            return Err(InvalidPnr {
                reason: "must be exactly 10 characters",
            });
        }
        if !s.bytes().all(|b| PNR_ALPHABET.contains(&b)) {
            return Err(InvalidPnr {
                reason: "must be ASCII letters or digits",
            });
        }
        Ok(Pnr(s))
    }

    /// Draw a random PNR. Uniqueness is the booking store's concern.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let s = (0..PNR_LEN)
            .map(|_| PNR_ALPHABET[rng.gen_range(0..PNR_ALPHABET.len())] as char)
            .collect();
        Pnr(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pnr {
    type Error = InvalidPnr;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pnr> for String {
    fn from(pnr: Pnr) -> Self {
        pnr.0
    }
}

impl fmt::Display for Pnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a registered user, as asserted by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is making a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub user: Option<UserId>,
    pub is_staff: bool,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user: Some(UserId(id.into())),
            is_staff: false,
        }
    }

    pub fn staff(id: impl Into<String>) -> Self {
        Self {
            user: Some(UserId(id.into())),
            is_staff: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Owners and staff may manage a booking.
    pub fn may_manage(&self, booking: &Booking) -> bool {
        self.is_staff || (self.user.is_some() && self.user == booking.user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Passenger details captured at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u8,
    pub gender: Gender,
}

impl Passenger {
    /// Check the fields a booking cannot be made without.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("passenger name is required");
        }
        if self.name.len() > 100 {
            return Err("passenger name is too long");
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err("passenger email is not a valid address"),
        }
        if self.phone.len() > 15 {
            return Err("passenger phone is too long");
        }
        if !(1..=120).contains(&self.age) {
            return Err("passenger age must be between 1 and 120");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// One travelled segment of a booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingLeg {
    /// 1 for the first leg, 2 for the second.
    pub sequence: u8,
    pub schedule: ScheduleId,
    pub route: RouteId,
    pub seat: SeatNumber,
    pub fare: Money,
}

/// A reservation over one or two legs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub pnr: Pnr,
    pub user: Option<UserId>,
    pub passenger: Passenger,
    pub booked_at: DateTime<Utc>,
    pub journey_date: NaiveDate,
    pub status: BookingStatus,
    pub seat_class: SeatClass,
    pub total_fare: Money,
    pub is_refundable: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refund_amount: Option<Money>,
    /// Ordered by `sequence`.
    pub legs: Vec<BookingLeg>,
}

impl Booking {
    pub fn is_connecting(&self) -> bool {
        self.legs.len() > 1
    }
}
