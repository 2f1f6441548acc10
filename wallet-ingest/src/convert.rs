//! Statement conversion: PDF table → flat CSV, or → category × period report.

use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use wallet_core::{
    aggregate, periods_spanning, write_report_csv_file, Error, ReportTable, Result, Transaction,
};

use crate::layout::TableScanner;
use crate::options::{ConvertOptions, PivotOptions, ReadOptions, TableOptions, WriteOptions};
use crate::pdf::extract_pages;
use crate::table::{merge_rows, Table};
use crate::types::Value;

/// Build the table from already extracted page texts.
pub fn read_text_table(pages: &[String], options: &TableOptions) -> Result<Table> {
    let scanner = TableScanner::new(options)?;
    let mut table = Table::new(options);
    let mut found = false;

    for (n, page) in pages.iter().enumerate() {
        let Some(raw) = scanner.extract_rows(page) else {
            debug!(page = n + 1, "no table header on page");
            continue;
        };
        found = true;
        let rows = merge_rows(&raw, options);
        debug!(page = n + 1, lines = raw.len(), rows = rows.len(), "table read");
        table.rows.extend(rows);
    }

    if !found {
        let names: Vec<_> = options
            .columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
            .collect();
        return Err(Error::extraction(format!(
            "no table with columns [{}] found",
            names.join(", ")
        )));
    }
    Ok(table)
}

pub fn read_report(path: &Path, options: &ReadOptions) -> Result<Table> {
    let table_options = options
        .pdf
        .as_ref()
        .and_then(|pdf| pdf.table.as_ref())
        .ok_or_else(|| Error::config("read options were not set (read.pdf.table)"))?;

    let pages = extract_pages(path)?;
    read_text_table(&pages, table_options)
        .map_err(|e| match e {
            Error::Extraction(msg) => Error::extraction(format!("{}: {msg}", path.display())),
            other => other,
        })
}

/// Turn table rows into transaction records for the pivot report.
pub fn to_transactions(table: &Table, pivot: &PivotOptions) -> Result<Vec<Transaction>> {
    let date_col = table.column_index(&pivot.date)?;
    let amount_col = table.column_index(&pivot.amount)?;
    let category_col = pivot
        .category
        .as_deref()
        .map(|c| table.column_index(c))
        .transpose()?;
    let currency_col = pivot
        .currency
        .as_deref()
        .map(|c| table.column_index(c))
        .transpose()?;

    let mut out = Vec::with_capacity(table.len());
    for (n, row) in table.rows.iter().enumerate() {
        let date = match &row[date_col] {
            Some(Value::Date(d)) => *d,
            other => {
                return Err(Error::extraction(format!(
                    "row {n}: column '{}' is not a date: {other:?}",
                    pivot.date
                )));
            }
        };

        let amount_cell = row[amount_col].as_ref();
        let amount = amount_cell.and_then(Value::as_decimal).ok_or_else(|| {
            Error::extraction(format!(
                "row {n}: column '{}' is not an amount: {amount_cell:?}",
                pivot.amount
            ))
        })?;

        let category = category_col
            .and_then(|c| row[c].as_ref())
            .map(Value::to_string)
            .unwrap_or_default();

        let currency = match (currency_col.and_then(|c| row[c].as_ref()), amount_cell) {
            (Some(v), _) => v.to_string(),
            (None, Some(Value::Money(m))) => m.currency.clone(),
            _ => String::new(),
        };

        out.push(Transaction::new(date, category, amount, currency));
    }
    Ok(out)
}

pub fn pivot_report(table: &Table, pivot: &PivotOptions) -> Result<ReportTable> {
    let records = to_transactions(table, pivot)?;
    let periods = periods_spanning(&records, pivot.by);
    Ok(aggregate(&records, &periods))
}

/// Write the converted table next to `input`, with a `.csv` extension.
pub fn write_report(input: &Path, table: &Table, options: &WriteOptions) -> Result<PathBuf> {
    let output = input.with_extension("csv");

    if let Some(pivot) = &options.pivot {
        let report = pivot_report(table, pivot)?;
        write_report_csv_file(&report, Some(output.as_path()))?;
    } else if let Some(csv) = &options.csv {
        let mut table = table.clone();
        if !csv.sort_by.is_empty() {
            table.sort_by(&csv.sort_by)?;
        }
        table.write_csv(File::create(&output)?, csv)?;
    } else {
        return Err(Error::config("write options were not set"));
    }

    Ok(output)
}

/// Read one PDF and write its CSV conversion. Returns the output path.
pub fn convert_file(input: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let table = read_report(input, &options.read)?;
    let output = write_report(input, &table, &options.write)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        rows = table.len(),
        "converted"
    );
    Ok(output)
}
