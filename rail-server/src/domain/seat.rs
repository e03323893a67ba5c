//! Seat classes, per-class capacities and seat numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five bookable seat classes.
///
/// The wire format uses the upper-case names `AC_FIRST`, `AC_2_TIER`,
/// `AC_3_TIER`, `SLEEPER` and `GENERAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    #[serde(rename = "AC_FIRST")]
    AcFirst,
    #[serde(rename = "AC_2_TIER")]
    Ac2Tier,
    #[serde(rename = "AC_3_TIER")]
    Ac3Tier,
    #[serde(rename = "SLEEPER")]
    Sleeper,
    #[serde(rename = "GENERAL")]
    General,
}

impl SeatClass {
    /// All seat classes, in fare order.
    pub const ALL: [SeatClass; 5] = [
        SeatClass::AcFirst,
        SeatClass::Ac2Tier,
        SeatClass::Ac3Tier,
        SeatClass::Sleeper,
        SeatClass::General,
    ];

    /// Wire code, e.g. `AC_2_TIER`.
    pub fn code(self) -> &'static str {
        match self {
            SeatClass::AcFirst => "AC_FIRST",
            SeatClass::Ac2Tier => "AC_2_TIER",
            SeatClass::Ac3Tier => "AC_3_TIER",
            SeatClass::Sleeper => "SLEEPER",
            SeatClass::General => "GENERAL",
        }
    }

    /// Passenger-facing label, e.g. `AC 2-Tier`.
    pub fn label(self) -> &'static str {
        match self {
            SeatClass::AcFirst => "AC First Class",
            SeatClass::Ac2Tier => "AC 2-Tier",
            SeatClass::Ac3Tier => "AC 3-Tier",
            SeatClass::Sleeper => "Sleeper",
            SeatClass::General => "General",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One seat count per class.
///
/// Used both for a train's fixed capacity and for a schedule's live
/// availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCapacity {
    #[serde(default)]
    pub ac_first: u32,
    #[serde(default)]
    pub ac_two_tier: u32,
    #[serde(default)]
    pub ac_three_tier: u32,
    #[serde(default)]
    pub sleeper: u32,
    #[serde(default)]
    pub general: u32,
}

impl ClassCapacity {
    /// Seats for one class.
    pub fn get(&self, class: SeatClass) -> u32 {
        match class {
            SeatClass::AcFirst => self.ac_first,
            SeatClass::Ac2Tier => self.ac_two_tier,
            SeatClass::Ac3Tier => self.ac_three_tier,
            SeatClass::Sleeper => self.sleeper,
            SeatClass::General => self.general,
        }
    }

    /// Mutable access to the count for one class.
    pub fn get_mut(&mut self, class: SeatClass) -> &mut u32 {
        match class {
            SeatClass::AcFirst => &mut self.ac_first,
            SeatClass::Ac2Tier => &mut self.ac_two_tier,
            SeatClass::Ac3Tier => &mut self.ac_three_tier,
            SeatClass::Sleeper => &mut self.sleeper,
            SeatClass::General => &mut self.general,
        }
    }

    /// Sum over all classes.
    pub fn total(&self) -> u32 {
        SeatClass::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Per-class minimum of `self` and `limit`.
    pub fn clamped_to(&self, limit: &ClassCapacity) -> ClassCapacity {
        let mut out = *self;
        for class in SeatClass::ALL {
            let slot = out.get_mut(class);
            *slot = (*slot).min(limit.get(class));
        }
        out
    }
}

/// Error returned when parsing an invalid seat number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat number: {reason}")]
pub struct InvalidSeatNumber {
    reason: &'static str,
}

/// An assigned seat such as `32C`: 1 to 5 uppercase letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatNumber(String);

impl SeatNumber {
    /// Parse a seat number, uppercasing letters.
    pub fn parse(s: &str) -> Result<Self, InvalidSeatNumber> {
        let s = s.trim();
        if s.is_empty() || s.len() > 5 {
            return Err(InvalidSeatNumber {
                reason: "must be 1 to 5 characters",
            });
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidSeatNumber {
                reason: "must be ASCII letters or digits",
            });
        }
        Ok(SeatNumber(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SeatNumber {
    type Error = InvalidSeatNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SeatNumber> for String {
    fn from(seat: SeatNumber) -> Self {
        seat.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
