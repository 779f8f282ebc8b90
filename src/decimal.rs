//! Signed monetary amount backed by `rust_decimal`.
//!
//! Statement exports carry amounts in localized text (`R$ 1200,50`), so
//! parsing lives here next to the type instead of in the CSV layer.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

/// Currency marker stripped from amount cells before parsing.
const CURRENCY_MARKER: &str = "R$";

/// A signed amount of money.
///
/// Positive values are money spent (outflow), negative values are money
/// received (inflow). Arithmetic is exact; only display rounds to
/// [`Amount::SCALE`] places.
///
/// # Examples
///
/// ```
/// use statement_analyzer::Amount;
///
/// let amount = Amount::parse_localized("R$ -1200,50").unwrap();
/// assert_eq!(amount.to_string(), "-1200.50");
/// assert!(amount.is_negative());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places used when displaying or serializing.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a `Decimal` without rounding.
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Parses a statement cell into an amount.
    ///
    /// Trims the cell, removes the `R$` marker and every whitespace
    /// character, then treats each comma as the decimal separator.
    /// Thousands separators are not recognized: `1.200,50` is rejected.
    pub fn parse_localized(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .trim()
            .replace(CURRENCY_MARKER, "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        if cleaned.is_empty() {
            return None;
        }
        Decimal::from_str(&cleaned).ok().map(Amount)
    }

    /// Formats the amount the way Brazilian statements print it,
    /// e.g. `R$ -1200,50`. [`Amount::parse_localized`] reads it back.
    pub fn to_localized(&self) -> String {
        format!("{} {}", CURRENCY_MARKER, self.to_string().replace('.', ","))
    }

    /// Returns the inner decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` for money spent.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` for money received.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Exact sum, or `None` when it falls outside the representable range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Mean of `count` amounts summing to `self`, rounded to
    /// [`Amount::SCALE`] places. Zero when `count` is zero.
    pub fn average(&self, count: usize) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let mean = self.0 / Decimal::from(count as u64);
        Amount(mean.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    fn rounded(&self) -> Decimal {
        let mut value = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(Self::SCALE);
        value
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded())
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
