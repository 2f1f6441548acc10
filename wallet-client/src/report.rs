//! The "incomes & expenses" analytics report, as scraped for one month.

use serde::{Deserialize, Serialize};

use wallet_core::{period_range, Error, Money, Period, PeriodKind, Result, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomesExpensesReport {
    pub title: String,
    pub total: Money,
    pub period: Period,
    /// Page order is kept.
    pub incomes: Vec<ReportEntry>,
    pub expenses: Vec<ReportEntry>,
}

impl IncomesExpensesReport {
    pub fn income(&self, category: &str) -> Option<&Money> {
        self.incomes.iter().find(|e| e.category == category).map(|e| &e.total)
    }

    pub fn expense(&self, category: &str) -> Option<&Money> {
        self.expenses.iter().find(|e| e.category == category).map(|e| &e.total)
    }

    /// One record per row, dated at the start of the report period.
    pub fn to_transactions(&self) -> Vec<Transaction> {
        self.incomes
            .iter()
            .chain(&self.expenses)
            .map(|e| Transaction::from_money(self.period.start, e.category.clone(), &e.total))
            .collect()
    }
}

pub fn reports_to_transactions(reports: &[IncomesExpensesReport]) -> Vec<Transaction> {
    reports.iter().flat_map(|r| r.to_transactions()).collect()
}

/// The months to fetch so that every period of the window is covered. The web
/// report is monthly, so only month-aligned period kinds can be built from it.
pub fn months_for_window(periods: &[Period]) -> Result<Vec<Period>> {
    let mut months: Vec<Period> = Vec::new();
    for period in periods {
        if !period.kind.is_month_aligned() {
            return Err(Error::config(format!(
                "web reports are monthly; cannot build {} periods (use month, quarter or year)",
                period.kind
            )));
        }
        for month in period_range(period.start, period.end(), PeriodKind::Month) {
            if !months.contains(&month) {
                months.push(month);
            }
        }
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use wallet_core::aggregate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(category: &str, amount: &str) -> ReportEntry {
        ReportEntry {
            category: category.into(),
            total: Money::new("€", Decimal::from_str(amount).unwrap()),
        }
    }

    fn report(month: u32, incomes: Vec<ReportEntry>, expenses: Vec<ReportEntry>) -> IncomesExpensesReport {
        IncomesExpensesReport {
            title: format!("2026-{month:02}"),
            total: Money::new("€", Decimal::ZERO),
            period: Period::containing(ymd(2026, month, 1), PeriodKind::Month),
            incomes,
            expenses,
        }
    }

    #[test]
    fn test_rows_become_month_records() {
        let r = report(3, vec![entry("Salary", "1500.00")], vec![entry("Food", "-1.12")]);
        let records = r.to_transactions();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|t| t.date == ymd(2026, 3, 1)));
        assert_eq!(records[1].category, "Food");
        assert!(records[1].amount.is_sign_negative());
        assert_eq!(r.expense("Food").unwrap().amount, Decimal::from_str("-1.12").unwrap());
        assert!(r.income("Food").is_none());
    }

    #[test]
    fn test_quarter_window_needs_three_months() {
        let quarter = Period::containing(ymd(2026, 2, 10), PeriodKind::Quarter);
        let months = months_for_window(&[quarter]).unwrap();
        let labels: Vec<_> = months.iter().map(Period::label).collect();
        assert_eq!(labels, vec!["2026.01", "2026.02", "2026.03"]);
    }

    #[test]
    fn test_week_window_is_rejected() {
        let week = Period::containing(ymd(2026, 2, 10), PeriodKind::Week);
        assert!(months_for_window(&[week]).unwrap_err().is_config());
    }

    #[test]
    fn test_monthly_reports_aggregate_by_quarter() {
        let reports = vec![
            report(1, vec![], vec![entry("Food", "-1.12")]),
            report(2, vec![], vec![entry("Food", "-2.09"), entry("Rent", "-500")]),
        ];
        let quarter = Period::containing(ymd(2026, 1, 1), PeriodKind::Quarter);
        let table = aggregate(&reports_to_transactions(&reports), &[quarter]);
        assert_eq!(table.row("Food").unwrap().values, vec![Decimal::from_str("-3.21").unwrap()]);
        assert_eq!(table.rows.last().unwrap().category, "Unknown");
    }
}
