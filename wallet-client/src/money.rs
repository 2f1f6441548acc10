//! Parsing amounts as rendered by the web app, e.g. `-€1,234.50`.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use wallet_core::{Error, Money, Result};

const MONEY_PATTERN: &str = r"^(?P<sign>[+-])?(?P<currency>\D+)(?P<amount>[0-9,.]+)$";

#[derive(Debug, Clone)]
pub struct MoneyParser {
    re: Regex,
}

impl MoneyParser {
    pub fn new() -> Result<Self> {
        let re = Regex::new(MONEY_PATTERN)
            .map_err(|e| Error::config(format!("money pattern: {e}")))?;
        Ok(Self { re })
    }

    pub fn parse(&self, value: &str) -> Result<Money> {
        let value = value.trim();
        let caps = self
            .re
            .captures(value)
            .ok_or_else(|| Error::extraction(format!("value doesn't match money pattern: '{value}'")))?;

        let sign = caps.name("sign").map_or("", |m| m.as_str());
        let digits = caps["amount"].replace(',', "");
        let amount = Decimal::from_str(&format!("{sign}{digits}"))
            .map_err(|_| Error::parse("money", value))?;

        Ok(Money::new(caps["currency"].trim(), amount))
    }
}

pub fn parse_money(value: &str) -> Result<Money> {
    MoneyParser::new()?.parse(value)
}
