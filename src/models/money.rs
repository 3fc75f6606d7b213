//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point
//! precision issues. On the wire (gateway rows, classifier responses) an
//! amount is a plain decimal number such as `1000.5`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use bizledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from a decimal value, rounding to the nearest cent
    ///
    /// Returns `None` for NaN, infinite input, or a value whose cents do not
    /// fit in an `i64`.
    pub fn from_decimal(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if !cents.is_finite() || cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    /// Convert whole units to cents, `None` on overflow
    fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(100).map(Self)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The amount as a decimal value
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Installment arithmetic: `self * factor`, `None` on overflow
    pub fn checked_mul(self, factor: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(factor)).map(Self)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "-10.50", "R$10.50", "$10.50", "10" and "10,50".
    /// Amounts too large for `i64` cents are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = s
            .strip_prefix("R$")
            .or_else(|| s.strip_prefix('$'))
            .unwrap_or(s)
            .trim();

        // A single comma acts as the decimal separator
        let normalized = if s.contains(',') && !s.contains('.') {
            s.replacen(',', ".", 1)
        } else {
            s.to_string()
        };

        let invalid = || MoneyParseError::InvalidFormat(original.to_string());
        let out_of_range = || MoneyParseError::OutOfRange(original.to_string());

        let cents = match normalized.split_once('.') {
            Some((units, fraction)) => {
                let units: i64 = if units.is_empty() {
                    0
                } else {
                    units.parse().map_err(|_| invalid())?
                };
                if !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let cents: i64 = match fraction.len() {
                    0 => 0,
                    1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => fraction[..2].parse().map_err(|_| invalid())?,
                };
                Self::from_units(units)
                    .and_then(|whole| whole.0.checked_add(cents))
                    .ok_or_else(out_of_range)?
            }
            None => {
                let units: i64 = normalized.parse().map_err(|_| invalid())?;
                Self::from_units(units).ok_or_else(out_of_range)?.0
            }
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal amount")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                Money::from_units(v).ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(Money::from_units)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                Money::from_decimal(v).ok_or_else(|| E::custom("amount out of range"))
            }

            // PostgREST renders numeric columns as strings
            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Money::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_from_decimal_rounds() {
        assert_eq!(Money::from_decimal(10.506).unwrap().cents(), 1051);
        assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
        assert!(Money::from_decimal(f64::NAN).is_none());
    }

    #[test]
    fn test_from_decimal_rejects_out_of_range() {
        assert!(Money::from_decimal(1e300).is_none());
        assert!(Money::from_decimal(-1e300).is_none());
        assert!(Money::from_decimal(9.3e16).is_none());
        assert_eq!(Money::from_decimal(9.0e16).unwrap().cents(), 9_000_000_000_000_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(5).format_with_symbol("R$"), "R$0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!(b.checked_mul(10).unwrap().cents(), 5000);
        assert!(Money::from_cents(i64::MAX / 2).checked_mul(3).is_none());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("R$ 10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10,5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("1.2x").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(
            Money::parse("99999999999999999"),
            Err(MoneyParseError::OutOfRange("99999999999999999".into()))
        );
        assert!(matches!(
            Money::parse("92233720368547758.99"),
            Err(MoneyParseError::OutOfRange(_))
        ));
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serializes_as_decimal() {
        let m = Money::from_cents(100050);
        assert_eq!(serde_json::to_string(&m).unwrap(), "1000.5");

        let whole: Money = serde_json::from_str("1000").unwrap();
        assert_eq!(whole.cents(), 100000);
        let decimal: Money = serde_json::from_str("1000.5").unwrap();
        assert_eq!(decimal, m);
        let text: Money = serde_json::from_str("\"1000.50\"").unwrap();
        assert_eq!(text, m);
    }

    #[test]
    fn test_deserialize_rejects_overflow() {
        assert!(serde_json::from_str::<Money>("99999999999999999").is_err());
        assert!(serde_json::from_str::<Money>("18446744073709551615").is_err());
        assert!(serde_json::from_str::<Money>("1e300").is_err());
    }
}
