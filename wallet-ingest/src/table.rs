//! Building a typed table out of raw statement lines.
//!
//! Statement rows often wrap: a description continues on the next line while
//! the date and amount cells stay empty. A line carrying every required cell
//! starts a new row; other lines are folded into the current row's merge
//! columns.

use std::cmp::Ordering;
use std::io;
use tracing::{debug, warn};

use wallet_core::{Error, Result};

use crate::layout::RawRow;
use crate::options::{ColumnOptions, CsvOptions, TableOptions};
use crate::types::{parse_value, Value};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Output names (after `rename`).
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(options: &TableOptions) -> Self {
        Self {
            columns: options
                .columns
                .iter()
                .map(|c| c.output_name().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::config(format!("unknown column '{name}'")))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable sort by the given columns; empty cells sort first.
    pub fn sort_by(&mut self, columns: &[String]) -> Result<()> {
        let keys = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;

        self.rows.sort_by(|a, b| {
            keys.iter()
                .map(|&k| match (&a[k], &b[k]) {
                    (Some(x), Some(y)) => x.sort_cmp(y),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                })
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Ok(())
    }

    pub fn write_csv<W: io::Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let selected = match &options.columns {
            Some(names) => names
                .iter()
                .map(|c| self.column_index(c))
                .collect::<Result<Vec<_>>>()?,
            None => (0..self.columns.len()).collect(),
        };

        let mut wtr = csv::Writer::from_writer(writer);

        let mut header: Vec<&str> = Vec::with_capacity(selected.len() + 1);
        if options.index {
            header.push("");
        }
        header.extend(selected.iter().map(|&i| self.columns[i].as_str()));
        wtr.write_record(&header)?;

        for (n, row) in self.rows.iter().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(header.len());
            if options.index {
                record.push(n.to_string());
            }
            record.extend(
                selected
                    .iter()
                    .map(|&i| row[i].as_ref().map(Value::to_string).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn is_ignored(raw: &RawRow, columns: &[ColumnOptions]) -> bool {
    columns.iter().zip(raw).any(|(col, cell)| {
        cell.as_deref()
            .is_some_and(|v| col.ignore_values.iter().any(|ignored| ignored == v))
    })
}

fn has_required(raw: &RawRow, columns: &[ColumnOptions]) -> bool {
    columns
        .iter()
        .zip(raw)
        .all(|(col, cell)| !col.required || cell.is_some())
}

fn parse_cells(raw: &RawRow, options: &TableOptions) -> Result<Vec<Vec<Value>>> {
    options
        .columns
        .iter()
        .zip(raw)
        .map(|(col, cell)| match cell {
            Some(text) => Ok(vec![parse_value(text, col.kind, &options.date_format)?]),
            None => Ok(Vec::new()),
        })
        .collect()
}

/// Collapse the values gathered for one row. Rows missing a required value
/// are dropped.
fn finish_row(cells: Vec<Vec<Value>>, columns: &[ColumnOptions]) -> Option<Row> {
    if columns.iter().zip(&cells).any(|(col, vals)| col.required && vals.is_empty()) {
        debug!(?cells, "dropping incomplete row");
        return None;
    }

    Some(
        columns
            .iter()
            .zip(cells)
            .map(|(col, vals)| match col.join_separator() {
                Some(_) if vals.is_empty() => None,
                Some(sep) => Some(Value::Str(
                    vals.iter().map(Value::to_string).collect::<Vec<_>>().join(sep),
                )),
                None => vals.into_iter().next(),
            })
            .collect(),
    )
}

/// Fold raw lines into typed rows.
pub fn merge_rows(raw_rows: &[RawRow], options: &TableOptions) -> Vec<Row> {
    let columns = &options.columns;
    let mut rows = Vec::new();
    let mut current: Option<Vec<Vec<Value>>> = None;

    for raw in raw_rows {
        if is_ignored(raw, columns) {
            continue;
        }

        if current.is_none() || has_required(raw, columns) {
            if let Some(done) = current.take().and_then(|cells| finish_row(cells, columns)) {
                rows.push(done);
            }
            match parse_cells(raw, options) {
                Ok(cells) => current = Some(cells),
                Err(e) => warn!(?raw, error = %e, "skipping unparseable line"),
            }
            continue;
        }

        if let Some(cells) = current.as_mut() {
            for ((col, cell), vals) in columns.iter().zip(raw).zip(cells.iter_mut()) {
                let (Some(text), Some(_)) = (cell, col.join_separator()) else {
                    continue;
                };
                match parse_value(text, col.kind, &options.date_format) {
                    Ok(v) => vals.push(v),
                    Err(e) => warn!(column = %col.name, error = %e, "skipping unparseable continuation"),
                }
            }
        }
    }

    if let Some(done) = current.and_then(|cells| finish_row(cells, columns)) {
        rows.push(done);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ConvertOptions;
    use chrono::NaiveDate;

    fn options() -> TableOptions {
        let yaml = r#"
read:
  pdf:
    table:
      columns:
        - {name: Date, type: date, rename: date}
        - {name: Description, required: false, merge: {join: {separator: " / "}}}
        - {name: Amount, type: money, rename: amount, ignore_values: ["n/a"]}
write:
  csv: {}
"#;
        ConvertOptions::from_yaml(yaml).unwrap().table().unwrap().clone()
    }

    fn raw(cells: [Option<&str>; 3]) -> RawRow {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn test_multiline_descriptions_are_joined() {
        let rows = merge_rows(
            &[
                raw([Some("02.01.2026"), Some("Grocery"), Some("-12.40 EUR")]),
                raw([None, Some("Receipt 1182"), None]),
                raw([None, Some("Card 4411"), None]),
                raw([Some("05.01.2026"), Some("Salary"), Some("2,100.00 EUR")]),
            ],
            &options(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0][0],
            Some(Value::Date(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()))
        );
        assert_eq!(
            rows[0][1],
            Some(Value::Str("Grocery / Receipt 1182 / Card 4411".into()))
        );
        assert_eq!(rows[1][1], Some(Value::Str("Salary".into())));
    }

    #[test]
    fn test_ignored_and_incomplete_lines() {
        let rows = merge_rows(
            &[
                raw([None, Some("Carried over"), None]),
                raw([Some("03.01.2026"), Some("Pending"), Some("n/a")]),
                raw([Some("04.01.2026"), Some("Fee"), Some("-1.00 EUR")]),
                raw([Some("bad date"), Some("Broken"), Some("-2.00 EUR")]),
                raw([None, Some("orphan"), None]),
            ],
            &options(),
        );

        // leading continuation has no dates; "n/a" line is ignored; the bad
        // date line is skipped and its continuation starts an incomplete row
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], Some(Value::Str("Fee".into())));
    }

    #[test]
    fn test_sort_and_write_csv() {
        let options = options();
        let mut table = Table::new(&options);
        table.rows = merge_rows(
            &[
                raw([Some("05.01.2026"), None, Some("3.00 EUR")]),
                raw([Some("01.01.2026"), Some("First"), Some("-1.50 EUR")]),
            ],
            &options,
        );
        table.sort_by(&["date".to_string()]).unwrap();

        let mut out = Vec::new();
        let csv = CsvOptions {
            columns: Some(vec!["date".into(), "amount".into(), "Description".into()]),
            sort_by: vec![],
            index: true,
        };
        table.write_csv(&mut out, &csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            ",date,amount,Description\n0,2026-01-01,-1.50,First\n1,2026-01-05,3.00,\n"
        );
    }

    #[test]
    fn test_unknown_sort_column() {
        let mut table = Table::new(&options());
        assert!(table.sort_by(&["balance".to_string()]).unwrap_err().is_config());
    }
}
