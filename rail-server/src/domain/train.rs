//! Trains and their fixed seat configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ClassCapacity, TrainId};

/// Service category of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainType {
    #[default]
    Express,
    Rapid,
    Passenger,
    Shatabdi,
    Rajdhani,
}

impl TrainType {
    pub fn label(self) -> &'static str {
        match self {
            TrainType::Express => "Express",
            TrainType::Rapid => "Rapid",
            TrainType::Passenger => "Passenger",
            TrainType::Shatabdi => "Shatabdi",
            TrainType::Rajdhani => "Rajdhani",
        }
    }
}

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainNumber {
    reason: &'static str,
}

/// Public train number such as `12841`: 1 to 10 ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrainNumber(String);

impl TrainNumber {
    pub fn parse(s: &str) -> Result<Self, InvalidTrainNumber> {
        let s = s.trim();
        if s.is_empty() || s.len() > 10 {
            return Err(InvalidTrainNumber {
                reason: "must be 1 to 10 characters",
            });
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidTrainNumber {
                reason: "must be ASCII letters or digits",
            });
        }
        Ok(TrainNumber(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TrainNumber {
    type Error = InvalidTrainNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TrainNumber> for String {
    fn from(number: TrainNumber) -> Self {
        number.0
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A train with its fixed per-class capacity.
///
/// Capacity is set when the train is created and does not vary by journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Train {
    pub id: TrainId,
    pub number: TrainNumber,
    pub name: String,
    pub train_type: TrainType,
    pub operator: String,
    pub total_coaches: u32,
    pub seats_per_coach: u32,
    pub capacity: ClassCapacity,
    pub is_active: bool,
}

impl Train {
    /// Nominal seats from the coach configuration.
    pub fn total_capacity(&self) -> u32 {
        self.total_coaches * self.seats_per_coach
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.number, self.name)
    }
}
