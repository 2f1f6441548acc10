//! Money amounts: a decimal value tagged with the currency it was reported in.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency: String,
    pub amount: Decimal,
}

impl Money {
    pub fn new(currency: impl Into<String>, amount: Decimal) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_amount(self.amount), self.currency)
    }
}

/// Render an amount with exactly two decimals. Zero never carries a sign.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded.to_string()
}

/// Parse a plain decimal, tolerating thousands separators (`1,234.50`).
pub fn parse_amount(value: &str) -> Result<Decimal> {
    let cleaned = value.trim().replace(',', "");
    Decimal::from_str(&cleaned).map_err(|_| Error::parse("amount", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount_pads_and_rounds() {
        assert_eq!(format_amount(dec("-1.12")), "-1.12");
        assert_eq!(format_amount(dec("3")), "3.00");
        assert_eq!(format_amount(dec("2.005")), "2.01");
        assert_eq!(format_amount(dec("-0.001")), "0.00");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        let sum = dec("-1.12") + dec("1.12");
        assert_eq!(format_amount(sum), "0.00");
    }

    #[test]
    fn test_parse_amount_strips_separators() {
        assert_eq!(parse_amount("1,234.50").unwrap(), dec("1234.50"));
        assert_eq!(parse_amount(" -7.1 ").unwrap(), dec("-7.1"));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_money_display() {
        let m = Money::new("€", dec("-12.5"));
        assert_eq!(m.to_string(), "-12.50€");
        assert_eq!(Money::new("€", Decimal::ZERO).to_string(), "0.00€");
    }
}
