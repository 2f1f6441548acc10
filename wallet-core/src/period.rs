//! Date periods: aligned day/week/month/quarter/year buckets, their labels and
//! the report windows built from them.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 5] = [
        PeriodKind::Day,
        PeriodKind::Week,
        PeriodKind::Month,
        PeriodKind::Quarter,
        PeriodKind::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Quarter => "quarter",
            PeriodKind::Year => "year",
        }
    }

    /// True when a bucket of this kind is a whole number of calendar months.
    pub fn is_month_aligned(&self) -> bool {
        matches!(self, PeriodKind::Month | PeriodKind::Quarter | PeriodKind::Year)
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PeriodKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::parse("period kind", s))
    }
}

/// An aligned date bucket. `start` is the first day of the bucket; the end is
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub kind: PeriodKind,
    pub start: NaiveDate,
}

impl Period {
    /// The bucket of `kind` that contains `date`.
    pub fn containing(date: NaiveDate, kind: PeriodKind) -> Self {
        let month_start = date - Days::new(date.day0() as u64);
        let start = match kind {
            PeriodKind::Day => date,
            PeriodKind::Week => date - Days::new(date.weekday().num_days_from_monday() as u64),
            PeriodKind::Month => month_start,
            PeriodKind::Quarter => month_start - Months::new(date.month0() % 3),
            PeriodKind::Year => month_start - Months::new(date.month0()),
        };
        Self { kind, start }
    }

    /// Exclusive end: the start of the following bucket. Saturates at
    /// `NaiveDate::MAX` for the last representable bucket.
    pub fn end(&self) -> NaiveDate {
        shift_date(self.start, self.kind, 1).unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Result<Self> {
        self.shift(1)
    }

    pub fn previous(&self) -> Result<Self> {
        self.shift(-1)
    }

    /// The bucket `n` steps away. Fails when it falls outside the
    /// representable date range.
    pub fn shift(&self, n: i64) -> Result<Self> {
        let start = shift_date(self.start, self.kind, n).ok_or_else(|| {
            Error::config(format!("{n} {} periods from {} is out of range", self.kind, self.start))
        })?;
        Ok(Self {
            kind: self.kind,
            start,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end()
    }

    /// Column title used in report CSV headers.
    pub fn label(&self) -> String {
        match self.kind {
            PeriodKind::Day => format!("{}", self.start.format("%Y.%m.%d")),
            PeriodKind::Week => format!(
                "{}-{}",
                self.start.format("%Y.%m.%d"),
                self.end().format("%Y.%m.%d")
            ),
            PeriodKind::Month => format!("{}", self.start.format("%Y.%m")),
            PeriodKind::Quarter => format!(
                "{}-{}",
                self.start.format("%Y.%m"),
                self.end().format("%Y.%m")
            ),
            PeriodKind::Year => format!("{}", self.start.format("%Y")),
        }
    }

    /// Inverse of [`Period::label`].
    pub fn from_label(label: &str) -> Result<Self> {
        let label = label.trim();
        let bad = || Error::parse("period label", label);

        let (kind, first) = match label.split_once('-') {
            None => match label.len() {
                4 => (PeriodKind::Year, format!("{label}.01.01")),
                7 => (PeriodKind::Month, format!("{label}.01")),
                10 => (PeriodKind::Day, label.to_string()),
                _ => return Err(bad()),
            },
            Some((first, _)) => match first.len() {
                7 => (PeriodKind::Quarter, format!("{first}.01")),
                10 => (PeriodKind::Week, first.to_string()),
                _ => return Err(bad()),
            },
        };

        let start = NaiveDate::parse_from_str(&first, "%Y.%m.%d").map_err(|_| bad())?;
        let period = Period { kind, start };
        if Period::containing(start, kind) != period || period.label() != label {
            return Err(bad());
        }
        Ok(period)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn shift_date(date: NaiveDate, kind: PeriodKind, n: i64) -> Option<NaiveDate> {
    let steps = n.unsigned_abs();
    match kind {
        PeriodKind::Day | PeriodKind::Week => {
            let per_step = if kind == PeriodKind::Week { 7 } else { 1 };
            let days = Days::new(steps.checked_mul(per_step)?);
            if n >= 0 { date.checked_add_days(days) } else { date.checked_sub_days(days) }
        }
        PeriodKind::Month | PeriodKind::Quarter | PeriodKind::Year => {
            let per_step = match kind {
                PeriodKind::Quarter => 3,
                PeriodKind::Year => 12,
                _ => 1,
            };
            let months = Months::new(u32::try_from(steps.checked_mul(per_step)?).ok()?);
            if n >= 0 { date.checked_add_months(months) } else { date.checked_sub_months(months) }
        }
    }
}

/// Complete periods of `kind`, starting with the one containing `start`, whose
/// exclusive end does not pass `end`.
pub fn period_range(start: NaiveDate, end: NaiveDate, kind: PeriodKind) -> Vec<Period> {
    let mut out = Vec::new();
    let mut p = Period::containing(start, kind);
    while p.end() <= end {
        out.push(p);
        match p.next() {
            Ok(next) => p = next,
            Err(_) => break,
        }
    }
    out
}

/// The span of time a report covers, as requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The N complete periods immediately before the current one.
    Last(u32),
    /// Complete periods since a date, up to today.
    Since(NaiveDate),
    /// Complete periods between two dates.
    Between(NaiveDate, NaiveDate),
}

impl Default for Window {
    fn default() -> Self {
        Window::Last(1)
    }
}

impl Window {
    pub fn resolve(&self, kind: PeriodKind, today: NaiveDate) -> Result<Vec<Period>> {
        let (start, end) = match *self {
            Window::Last(0) => return Err(Error::config("--last must be at least 1")),
            Window::Last(n) => {
                let current = Period::containing(today, kind);
                (current.shift(-i64::from(n))?.start, current.start)
            }
            Window::Since(since) => (since, today),
            Window::Between(start, end) => {
                if start > end {
                    return Err(Error::config(format!(
                        "period start {start} is after its end {end}"
                    )));
                }
                (start, end)
            }
        };

        let periods = period_range(start, end, kind);
        if periods.is_empty() {
            return Err(Error::config(format!(
                "no complete {kind} periods between {start} and {end}"
            )));
        }
        Ok(periods)
    }
}

/// Parse `START:END` (ISO dates) as given to `--period`.
pub fn parse_date_span(value: &str) -> Result<(NaiveDate, NaiveDate)> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| Error::parse("date span", value))?;
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::parse("date", s))
    };
    Ok((parse(start)?, parse(end)?))
}
