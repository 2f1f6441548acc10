//! Transaction records produced by the extractors and consumed by the aggregator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A single dated, categorized amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Empty when the source did not categorize the record.
    pub category: String,
    /// Positive = income, negative = expense
    pub amount: Decimal,
    pub currency: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            currency: currency.into(),
        }
    }

    pub fn from_money(date: NaiveDate, category: impl Into<String>, money: &Money) -> Self {
        Self::new(date, category, money.amount, money.currency.clone())
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.trim().is_empty()
    }
}
