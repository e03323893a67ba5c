//! Fare amounts.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid money amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount {input:?}: {reason}")]
pub struct InvalidMoney {
    input: String,
    reason: &'static str,
}

/// An amount of money in minor units (paise).
///
/// Fares are products of a per-km rate with two decimal places and an
/// integer distance, so integer minor units keep every fare exact. On the
/// wire amounts are decimal strings such as `"829.50"`.
///
/// # Examples
///
/// ```
/// use rail_server::domain::Money;
///
/// let per_km = Money::parse("0.5").unwrap();
/// let fare = per_km * 1659;
/// assert_eq!(fare.to_string(), "829.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Amount from minor units.
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Amount in minor units.
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Parse a non-negative decimal amount with at most two fractional digits.
    pub fn parse(s: &str) -> Result<Self, InvalidMoney> {
        let err = |reason| InvalidMoney {
            input: s.to_string(),
            reason,
        };

        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("expected digits before the decimal point"));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("at most two decimal places"));
        }

        let whole: i64 = whole.parse().map_err(|_| err("amount too large"))?;
        let frac_minor = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err("bad fraction"))? * 10,
            _ => frac.parse::<i64>().map_err(|_| err("bad fraction"))?,
        };

        whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(frac_minor))
            .map(Money)
            .ok_or_else(|| err("amount too large"))
    }

    /// `percent` % of this amount, rounded half up to the minor unit.
    pub fn percent(self, percent: i64) -> Money {
        Money((self.0 * percent + 50).div_euclid(100))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0 * i64::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl TryFrom<String> for Money {
    type Error = InvalidMoney;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amounts() {
        assert_eq!(Money::parse("829.50").unwrap().minor(), 82950);
        assert_eq!(Money::parse("829.5").unwrap().minor(), 82950);
        assert_eq!(Money::parse("829").unwrap().minor(), 82900);
        assert_eq!(Money::parse("0.05").unwrap().minor(), 5);
        assert_eq!(Money::parse(" 12.00 ").unwrap().minor(), 1200);
    }

    #[test]
    fn reject_bad_amounts() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse(".5").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("-1").is_err());
        assert!(Money::parse("1,5").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Money::from_minor(82950).to_string(), "829.50");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
    }

    #[test]
    fn fare_from_rate_and_distance() {
        let rate = Money::parse("0.45").unwrap();
        assert_eq!((rate * 2364).to_string(), "1063.80");
    }

    #[test]
    fn ninety_percent_rounds_half_up() {
        assert_eq!(Money::from_minor(82950).percent(90), Money::from_minor(74655));
        assert_eq!(Money::from_minor(5).percent(90), Money::from_minor(5));
        assert_eq!(Money::from_minor(1).percent(90), Money::from_minor(1));
        assert_eq!(Money::from_minor(0).percent(90), Money::ZERO);
    }

    #[test]
    fn sum_of_amounts() {
        let total: Money = [Money::from_minor(100), Money::from_minor(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_minor(350));
    }

    #[test]
    fn serde_as_decimal_string() {
        let m: Money = serde_json::from_str("\"829.5\"").unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"829.50\"");
    }
}
