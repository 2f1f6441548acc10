//! Report CSV format: `category,<period labels...>`, one row per category,
//! amounts with two decimals.

use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

use crate::aggregate::{ReportRow, ReportTable};
use crate::error::{Error, Result};
use crate::money::{format_amount, parse_amount};
use crate::period::Period;

const CATEGORY_HEADER: &str = "category";

pub fn write_report_csv<W: io::Write>(table: &ReportTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![CATEGORY_HEADER.to_string()];
    header.extend(table.labels());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.category.clone());
        record.extend(row.values.iter().copied().map(format_amount));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the report to `path`, or to stdout when no path is given.
pub fn write_report_csv_file(table: &ReportTable, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_report_csv(table, file)?;
            info!(path = %path.display(), rows = table.rows.len(), "report written");
        }
        None => write_report_csv(table, io::stdout().lock())?,
    }
    Ok(())
}

pub fn read_report_csv<R: io::Read>(reader: R) -> Result<ReportTable> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut columns = headers.iter();
    if columns.next() != Some(CATEGORY_HEADER) {
        return Err(Error::extraction(format!(
            "report header must start with '{CATEGORY_HEADER}'"
        )));
    }
    let periods = columns
        .map(Period::from_label)
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut cells = record.iter();
        let category = cells.next().unwrap_or_default().to_string();
        let values = cells.map(parse_amount).collect::<Result<Vec<Decimal>>>()?;
        if values.len() != periods.len() {
            return Err(Error::extraction(format!(
                "row '{category}' has {} values for {} periods",
                values.len(),
                periods.len()
            )));
        }
        rows.push(ReportRow { category, values });
    }

    Ok(ReportTable { periods, rows })
}
