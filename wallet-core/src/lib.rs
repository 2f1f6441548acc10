//! wallet-core: money, date periods, transaction records, the category × period
//! aggregator and the report CSV format.

pub mod aggregate;
pub mod csv_report;
pub mod error;
pub mod money;
pub mod period;
pub mod record;
pub mod time;

pub use aggregate::{aggregate, periods_spanning, ReportRow, ReportTable, UNKNOWN_CATEGORY};
pub use csv_report::{read_report_csv, write_report_csv, write_report_csv_file};
pub use error::{Error, Result};
pub use money::Money;
pub use period::{period_range, Period, PeriodKind, Window};
pub use record::Transaction;
