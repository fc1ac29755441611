//! Amount type for monetary values that arrive as currency strings.
//!
//! Extracted documents carry amounts in whatever shape the source text used:
//! `$1,800.00`, `1800.00`, `1800`, or the `"NA"` sentinel. `Amount` wraps
//! `Decimal` and normalizes all of these to one canonical value. Full
//! precision is kept for accumulation; comparisons and display happen at two
//! decimal places.

use crate::model::Field;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// A monetary value in the (single, implicit) working currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

/// Error for a currency string that does not parse as a decimal value.
#[derive(Error, Debug)]
#[error("unparseable amount '{raw}'")]
pub struct AmountParseError {
    raw: String,
    source: rust_decimal::Error,
}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parses a currency-formatted string, stripping the dollar sign and
    /// thousands separators. An empty string is zero.
    pub fn parse(raw: &str) -> Result<Self, AmountParseError> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '$' && *c != ',')
            .collect();
        if cleaned.is_empty() {
            return Ok(Amount::ZERO);
        }
        let value = Decimal::from_str(&cleaned).map_err(|source| AmountParseError {
            raw: raw.to_string(),
            source,
        })?;
        Ok(Amount(value))
    }

    /// Parses a `Field`. An absent value is exactly 0.00.
    pub fn from_field(field: &Field) -> Result<Self, AmountParseError> {
        match field.as_str() {
            Some(raw) => Self::parse(raw),
            None => Ok(Amount::ZERO),
        }
    }

    /// Parses a `Field`, degrading to 0.00 when the value does not parse.
    ///
    /// Used for line-item amounts and bill totals, where one garbled value
    /// must not abort the whole reconciliation.
    pub fn lenient(field: &Field) -> Self {
        match Self::from_field(field) {
            Ok(amount) => amount,
            Err(e) => {
                warn!("substituting 0.00 for unparseable amount: {e}");
                Amount::ZERO
            }
        }
    }

    /// Returns the underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value rounded to two decimal places, as used for
    /// equality checks and display.
    pub fn rounded(&self) -> Self {
        Amount(self.0.round_dp(2))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl fmt::Display for Amount {
    /// Renders with exactly two decimal places, e.g. `1800.00` or `-30.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::parse(&s).map_err(serde::de::Error::custom)
    }
}
