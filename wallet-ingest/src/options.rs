//! YAML options describing how to read a statement table and how to write it.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use wallet_core::{Error, PeriodKind, Result};

use crate::types::ColumnType;

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertOptions {
    pub read: ReadOptions,
    pub write: WriteOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadOptions {
    #[serde(default)]
    pub pdf: Option<PdfOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdfOptions {
    #[serde(default)]
    pub table: Option<TableOptions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableOptions {
    pub columns: Vec<ColumnOptions>,
    /// Substrings marking the line that closes a table.
    #[serde(default)]
    pub footers: Vec<String>,
    #[serde(default)]
    pub include_footer: bool,
    /// Minimum run of spaces separating two cells on a line.
    #[serde(default = "default_word_join_tolerance")]
    pub word_join_tolerance: usize,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_word_join_tolerance() -> usize {
    2
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnOptions {
    /// Header text as printed in the statement.
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnType,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub rename: Option<String>,
    /// Lines holding one of these raw values in this column are skipped.
    #[serde(default)]
    pub ignore_values: Vec<String>,
    #[serde(default)]
    pub merge: Option<MergeOptions>,
}

impl ColumnOptions {
    pub fn output_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    pub fn join_separator(&self) -> Option<&str> {
        self.merge
            .as_ref()
            .and_then(|m| m.join.as_ref())
            .map(|j| j.separator.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeOptions {
    #[serde(default)]
    pub join: Option<JoinOptions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinOptions {
    pub separator: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteOptions {
    #[serde(default)]
    pub csv: Option<CsvOptions>,
    #[serde(default)]
    pub pivot: Option<PivotOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvOptions {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub sort_by: Vec<String>,
    #[serde(default)]
    pub index: bool,
}

/// Emit a category × period report instead of the flat table.
#[derive(Debug, Clone, Deserialize)]
pub struct PivotOptions {
    pub date: String,
    pub amount: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub by: PeriodKind,
}

impl ConvertOptions {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let options: ConvertOptions = serde_yaml::from_str(text)
            .map_err(|e| Error::config(format!("invalid convert options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn table(&self) -> Result<&TableOptions> {
        self.read
            .pdf
            .as_ref()
            .and_then(|pdf| pdf.table.as_ref())
            .ok_or_else(|| Error::config("read options were not set (read.pdf.table)"))
    }

    pub fn validate(&self) -> Result<()> {
        let table = self.table()?;
        if table.columns.is_empty() {
            return Err(Error::config("read.pdf.table.columns is empty"));
        }
        if !table.columns.iter().any(|c| c.required) {
            return Err(Error::config("at least one column must be required"));
        }

        let mut names = HashSet::new();
        for col in &table.columns {
            if col.name.trim().is_empty() {
                return Err(Error::config("column names must not be empty"));
            }
            if !names.insert(col.output_name()) {
                return Err(Error::config(format!("duplicate column '{}'", col.output_name())));
            }
            if col.merge.is_some() && col.join_separator().is_none() {
                return Err(Error::config(format!(
                    "unknown merge options for column '{}'",
                    col.name
                )));
            }
        }

        let known = |name: &str, what: &str| {
            if names.contains(name) {
                Ok(())
            } else {
                Err(Error::config(format!("{what} refers to unknown column '{name}'")))
            }
        };

        match (&self.write.csv, &self.write.pivot) {
            (None, None) => return Err(Error::config("write options were not set")),
            (_, Some(pivot)) => {
                known(pivot.date.as_str(), "write.pivot.date")?;
                known(pivot.amount.as_str(), "write.pivot.amount")?;
                if let Some(category) = &pivot.category {
                    known(category.as_str(), "write.pivot.category")?;
                }
                if let Some(currency) = &pivot.currency {
                    known(currency.as_str(), "write.pivot.currency")?;
                }
            }
            (Some(csv), None) => {
                for name in csv.columns.iter().flatten().chain(&csv.sort_by) {
                    known(name.as_str(), "write.csv")?;
                }
            }
        }

        Ok(())
    }
}

pub fn load_options(path: &Path) -> Result<ConvertOptions> {
    let text = std::fs::read_to_string(path)?;
    ConvertOptions::from_yaml(&text)
        .map_err(|e| Error::config(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: &str = r#"
read:
  pdf:
    table:
      columns:
        - name: Date
          type: date
          rename: date
        - name: Description
          required: false
          merge:
            join:
              separator: " "
        - name: Amount
          type: money
          rename: amount
      footers: ["Closing balance"]
write:
  csv:
    columns: [date, amount]
    sort_by: [date]
"#;

    #[test]
    fn test_parse_options_with_defaults() {
        let options = ConvertOptions::from_yaml(OPTIONS).unwrap();
        let table = options.table().unwrap();
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].kind, ColumnType::Date);
        assert_eq!(table.columns[0].output_name(), "date");
        assert!(table.columns[0].required);
        assert_eq!(table.columns[1].join_separator(), Some(" "));
        assert_eq!(table.word_join_tolerance, 2);
        assert_eq!(table.date_format, "%d.%m.%Y");
        assert!(!table.include_footer);
    }

    #[test]
    fn test_missing_write_options() {
        let text = OPTIONS.split("write:").next().unwrap().to_string() + "write: {}\n";
        let err = ConvertOptions::from_yaml(&text).unwrap_err();
        assert!(err.to_string().contains("write options were not set"));
    }

    #[test]
    fn test_unknown_sort_column() {
        let text = OPTIONS.replace("sort_by: [date]", "sort_by: [balance]");
        let err = ConvertOptions::from_yaml(&text).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("balance"));
    }

    #[test]
    fn test_merge_without_join_is_rejected() {
        let text = OPTIONS.replace(
            "merge:\n            join:\n              separator: \" \"",
            "merge: {}",
        );
        assert!(ConvertOptions::from_yaml(&text).is_err());
    }

    #[test]
    fn test_pivot_options() {
        let text = OPTIONS.replace(
            "  csv:\n    columns: [date, amount]\n    sort_by: [date]\n",
            "  pivot:\n    date: date\n    amount: amount\n    category: Description\n    by: quarter\n",
        );
        let options = ConvertOptions::from_yaml(&text).unwrap();
        let pivot = options.write.pivot.unwrap();
        assert_eq!(pivot.by, PeriodKind::Quarter);
        assert_eq!(pivot.category.as_deref(), Some("Description"));
    }
}
