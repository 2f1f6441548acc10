use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use wallet_core::{Error, Money, Result};

/// How a table cell is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    #[default]
    Str,
    Date,
    Money,
}

/// A parsed table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Money(Money),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Money(_) => 3,
            Value::Date(_) => 4,
            Value::Str(_) => 5,
        }
    }

    /// Total order used when sorting output rows. Values of different types
    /// sort by type.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Money(a), Value::Money(b)) => a.amount.cmp(&b.amount),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Numeric view of the cell, for amount columns.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(i) => Some(Decimal::from(*i)),
            Value::Float(f) => Decimal::from_str(&f.to_string()).ok(),
            Value::Money(m) => Some(m.amount),
            Value::Str(s) => wallet_core::money::parse_amount(s).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Money(m) => write!(f, "{}", m.amount),
        }
    }
}

/// Parse one raw cell according to its column type.
pub fn parse_value(raw: &str, kind: ColumnType, date_format: &str) -> Result<Value> {
    let value = raw.trim();
    match kind {
        ColumnType::Bool => match value.to_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(Error::parse("bool", raw)),
        },
        ColumnType::Int => value
            .parse()
            .map(Value::Int)
            .map_err(|_| Error::parse("int", raw)),
        ColumnType::Float => value
            .parse()
            .map(Value::Float)
            .map_err(|_| Error::parse("float", raw)),
        ColumnType::Str => Ok(Value::Str(value.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(value, date_format)
            .map(Value::Date)
            .map_err(|_| Error::parse("date", raw)),
        ColumnType::Money => {
            let (amount, currency) = value.split_once(' ').unwrap_or((value, ""));
            let amount = Decimal::from_str(&amount.replace(',', ""))
                .map_err(|_| Error::parse("money", raw))?;
            Ok(Value::Money(Money::new(currency.trim(), amount)))
        }
    }
}
