//! Station types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StationId;

/// Maximum length of a station code.
const MAX_CODE_LEN: usize = 8;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid station code such as `MAS` or `NDLS`.
///
/// Codes are 1 to 8 uppercase ASCII letters or digits. This type guarantees
/// that any `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use rail_server::domain::StationCode;
///
/// let mas = StationCode::parse("MAS").unwrap();
/// assert_eq!(mas.as_str(), "MAS");
///
/// // Lowercase is rejected by `parse` but accepted by `parse_normalized`
/// assert!(StationCode::parse("mas").is_err());
/// assert_eq!(StationCode::parse_normalized(" mas ").unwrap().as_str(), "MAS");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationCode(String);

impl StationCode {
    /// Parse a station code, which must already be uppercase.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        if s.is_empty() || s.len() > MAX_CODE_LEN {
            return Err(InvalidStationCode {
                reason: "must be 1 to 8 characters",
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidStationCode {
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        Ok(StationCode(s.to_string()))
    }

    /// Parse a station code after trimming whitespace and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationCode {
    type Error = InvalidStationCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_normalized(&value)
    }
}

impl From<StationCode> for String {
    fn from(code: StationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position of a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A station in the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: StationId,
    pub code: StationCode,
    pub name: String,
    pub city: String,
    pub state: String,
    pub location: Option<GeoPoint>,
}

impl Station {
    /// Case-insensitive match against the station's name or code.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.code.as_str().to_lowercase().contains(&query)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.code, self.name, self.city)
    }
}
