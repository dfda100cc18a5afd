// Money - exact prices as integer cents
//
// Prices are stored as a count of minor currency units. Floats only appear
// at the parsing boundary and in the derived major-unit view; arithmetic on
// stored amounts is integer arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DomainError, DomainResult};

/// A non-negative amount of money, stored as integer cents.
///
/// An absent price is modeled as `Option<Money>`, not as a special Money
/// state. Comparison and equality are by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Build from a cent count. Negative amounts are rejected.
    pub fn from_cents(cents: i64) -> DomainResult<Self> {
        if cents < 0 {
            return Err(DomainError::invalid_value("price", "cannot be negative"));
        }
        Ok(Money { cents })
    }

    /// Build from a major-unit amount (e.g. 12.5 euro), rounding to the
    /// nearest cent.
    ///
    /// Ties round half-to-even: `0.005` becomes 0 cents, `0.015` becomes 2.
    pub fn from_major(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::invalid_value("price", "not a number"));
        }
        if value < 0.0 {
            return Err(DomainError::invalid_value("price", "cannot be negative"));
        }
        Ok(Money {
            cents: (value * 100.0).round_ties_even() as i64,
        })
    }

    /// Parse flexible textual input.
    ///
    /// Empty or whitespace-only input means "no price" and yields `None`.
    /// Both `.` and `,` are accepted as the decimal separator. Anything that
    /// does not clean up to a non-negative number is an `InvalidValue`.
    pub fn parse(raw: &str) -> DomainResult<Option<Self>> {
        let cleaned = raw.trim();
        if cleaned.is_empty() {
            return Ok(None);
        }

        let value: f64 = cleaned
            .replace(',', ".")
            .parse()
            .map_err(|_| DomainError::invalid_value("price", format!("not a number: {raw}")))?;

        Self::from_major(value).map(Some)
    }

    pub fn zero() -> Self {
        Money { cents: 0 }
    }

    /// Stored cent count.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Derived major-unit view (cents / 100). Never stored.
    pub fn major_units(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_decimal() {
        let money = Money::parse("12.50").unwrap().unwrap();
        assert_eq!(money.cents(), 1250);
        assert_eq!(money.major_units(), 12.5);
    }

    #[test]
    fn test_parse_comma_separator() {
        let money = Money::parse("12,50").unwrap().unwrap();
        assert_eq!(money.cents(), 1250);
    }

    #[test]
    fn test_parse_integer_input() {
        let money = Money::parse("7").unwrap().unwrap();
        assert_eq!(money.cents(), 700);
    }

    #[test]
    fn test_parse_empty_is_unset() {
        assert_eq!(Money::parse("").unwrap(), None);
        assert_eq!(Money::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_negative_rejected() {
        let err = Money::parse("-1").unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));

        let err = Money::from_major(-1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));

        let err = Money::from_cents(-1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12.3.4").is_err());
    }

    #[test]
    fn test_rounding_half_to_even_at_half_cent() {
        // Bankers' rounding on the half-cent boundary: 0.5 cents goes to the
        // even neighbor, 1.5 cents goes up to the even 2.
        assert_eq!(Money::parse("0.005").unwrap().unwrap().cents(), 0);
        assert_eq!(Money::parse("0.015").unwrap().unwrap().cents(), 2);
        assert_eq!(Money::parse("0.025").unwrap().unwrap().cents(), 2);
    }

    #[test]
    fn test_round_trip_major_units() {
        for raw in ["0", "0.01", "1.99", "12,50", "999.95"] {
            let money = Money::parse(raw).unwrap().unwrap();
            let expected: f64 = raw.replace(',', ".").parse().unwrap();
            assert!((money.major_units() - expected).abs() < 0.005, "{raw}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1250).unwrap().to_string(), "12.50");
        assert_eq!(Money::from_cents(5).unwrap().to_string(), "0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }
}
