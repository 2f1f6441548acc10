//! wallet-ingest: statement ingestion from exported PDFs. Locates the
//! transaction table in the extracted text, merges wrapped lines, parses
//! typed cells and writes CSV (flat or as a category × period report).

pub mod convert;
pub mod layout;
pub mod options;
pub mod pdf;
pub mod table;
pub mod types;

pub use convert::{convert_file, pivot_report, read_report, read_text_table, to_transactions, write_report};
pub use options::{load_options, ConvertOptions};
pub use table::Table;
pub use types::{ColumnType, Value};
