//! Category × period aggregation of transaction records.
//!
//! Each record adds its signed amount to exactly one cell: the row of its
//! category and the column of the period containing its date. Rows come out in
//! first-seen order, followed by a single `Unknown` row that collects
//! uncategorized records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::period::{Period, PeriodKind};
use crate::record::Transaction;

/// Fallback category for records without one.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub category: String,
    /// One value per report period, in column order.
    pub values: Vec<Decimal>,
}

impl ReportRow {
    pub fn total(&self) -> Decimal {
        self.values.iter().copied().sum()
    }
}

/// The pivot: periods as columns, categories as rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub periods: Vec<Period>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn labels(&self) -> Vec<String> {
        self.periods.iter().map(Period::label).collect()
    }

    pub fn row(&self, category: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.category == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.category.as_str())
    }
}

fn category_key(txn: &Transaction) -> &str {
    if txn.is_uncategorized() { UNKNOWN_CATEGORY } else { txn.category.trim() }
}

/// Group `records` by category and by the period containing their date.
///
/// Records outside every period still register their category, so the row
/// exists with zero values.
pub fn aggregate(records: &[Transaction], periods: &[Period]) -> ReportTable {
    let mut order: Vec<String> = Vec::new();
    let mut sums: Vec<Vec<Decimal>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut currencies: HashMap<usize, &str> = HashMap::new();
    let mut mixed: HashSet<usize> = HashSet::new();
    let mut outside = 0usize;

    for txn in records {
        let key = category_key(txn);
        let row = match index.get(key) {
            Some(&row) => row,
            None => {
                order.push(key.to_string());
                sums.push(vec![Decimal::ZERO; periods.len()]);
                index.insert(key.to_string(), order.len() - 1);
                order.len() - 1
            }
        };

        let currency = *currencies.entry(row).or_insert(txn.currency.as_str());
        if currency != txn.currency && mixed.insert(row) {
            warn!(
                category = %order[row],
                first = currency,
                other = %txn.currency,
                "category mixes currencies; amounts are summed without conversion"
            );
        }

        match periods.iter().position(|p| p.contains(txn.date)) {
            Some(col) => sums[row][col] += txn.amount,
            None => outside += 1,
        }
    }

    if outside > 0 {
        debug!(outside, "records outside the report window were ignored");
    }

    let mut unknown = vec![Decimal::ZERO; periods.len()];
    let mut rows = Vec::with_capacity(order.len() + 1);
    for (category, values) in order.into_iter().zip(sums) {
        if category == UNKNOWN_CATEGORY {
            unknown = values;
        } else {
            rows.push(ReportRow { category, values });
        }
    }
    rows.push(ReportRow {
        category: UNKNOWN_CATEGORY.to_string(),
        values: unknown,
    });

    ReportTable {
        periods: periods.to_vec(),
        rows,
    }
}

/// Every aligned period of `kind` from the earliest to the latest record.
pub fn periods_spanning(records: &[Transaction], kind: PeriodKind) -> Vec<Period> {
    let (Some(first), Some(last)) = (
        records.iter().map(|t| t.date).min(),
        records.iter().map(|t| t.date).max(),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut p = Period::containing(first, kind);
    while p.start <= last {
        out.push(p);
        match p.next() {
            Ok(next) => p = next,
            Err(_) => break,
        }
    }
    out
}
