//! Widget price parsing
//!
//! Prices are stored as NUMERIC(8,2): at most six integer digits and
//! exactly two fractional digits.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use super::ValidationError;

/// Fractional digits kept in the store
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound for the absolute value (10^6)
const PRICE_LIMIT: i64 = 1_000_000;

const PRICE_REASON: &str = "it must be a decimal number (f.e. 0.00)";

/// Validated price with scale fixed to two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    /// The price used when a widget is created without one.
    pub fn zero() -> Self {
        Self(Decimal::new(0, PRICE_SCALE))
    }

    /// Parse a price from a decimal string.
    ///
    /// Extra fractional digits are rounded half away from zero, matching
    /// how the store rounds NUMERIC input.
    ///
    /// # Example
    /// ```
    /// use widgetctl_server::models::Price;
    ///
    /// assert_eq!(Price::parse("12.5").unwrap().to_string(), "12.50");
    /// assert_eq!(Price::parse("0.125").unwrap().to_string(), "0.13");
    /// assert!(Price::parse("twelve").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        let parsed = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| ValidationError::InvalidFormat {
                field: "price",
                reason: PRICE_REASON,
            })?;
        Self::from_decimal(parsed)
    }

    /// Parse a price from a JSON string or number.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => Self::parse(&n.to_string()),
            _ => Err(ValidationError::InvalidFormat {
                field: "price",
                reason: PRICE_REASON,
            }),
        }
    }

    fn from_decimal(value: Decimal) -> Result<Self, ValidationError> {
        let mut rounded =
            value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.abs() >= Decimal::from(PRICE_LIMIT) {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "absolute value must be below 1000000",
            });
        }
        rounded.rescale(PRICE_SCALE);
        Ok(Self(rounded))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Parse an optional price field where JSON null means "no price".
pub(crate) fn parse_nullable_price(value: &Value) -> Result<Option<Price>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        other => Price::from_json(other).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn default_is_zero_with_scale() {
        assert_eq!(Price::zero().to_string(), "0.00");
    }

    #[test]
    fn parses_strings_and_numbers() {
        assert_eq!(Price::parse("9.99").unwrap().to_string(), "9.99");
        assert_eq!(Price::parse(" 7 ").unwrap().to_string(), "7.00");
        assert_eq!(Price::from_json(&json!(3.5)).unwrap().to_string(), "3.50");
        assert_eq!(Price::from_json(&json!(42)).unwrap().to_string(), "42.00");
        assert_eq!(Price::parse("1e2").unwrap().to_string(), "100.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(Price::parse("2.345").unwrap().to_string(), "2.35");
        assert_eq!(Price::parse("-2.345").unwrap().to_string(), "-2.35");
        assert_eq!(Price::parse("2.344").unwrap().to_string(), "2.34");
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "1.2.3", "12,50"] {
            assert!(
                matches!(
                    Price::parse(bad),
                    Err(ValidationError::InvalidFormat { field: "price", .. })
                ),
                "expected rejection for {bad:?}"
            );
        }
        assert!(Price::from_json(&json!(true)).is_err());
        assert!(Price::from_json(&json!({"amount": 1})).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Price::parse("999999.99").is_ok());
        assert!(matches!(
            Price::parse("1000000"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            Price::parse("999999.995"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn null_means_no_price() {
        assert_eq!(parse_nullable_price(&json!(null)).unwrap(), None);
        assert_eq!(
            parse_nullable_price(&json!("1.10")).unwrap().map(|p| p.to_string()),
            Some("1.10".to_string())
        );
    }

    proptest! {
        #[test]
        fn cents_survive_parsing(cents in -99_999_999i64..=99_999_999i64) {
            let text = Decimal::new(cents, 2).to_string();
            let price = Price::parse(&text).unwrap();
            prop_assert_eq!(price.as_decimal(), Decimal::new(cents, 2));
            prop_assert_eq!(price.as_decimal().scale(), PRICE_SCALE);
        }
    }
}
