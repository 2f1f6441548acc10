//! Locating statement tables in extracted PDF text.
//!
//! Text extraction keeps the horizontal layout of a page: a table shows up as
//! a header line naming the columns, followed by data lines whose cells sit
//! under their header. Cells on a line are separated by runs of at least
//! `word_join_tolerance` spaces.

use regex::Regex;

use wallet_core::{Error, Result};

use crate::options::{ColumnOptions, TableOptions};

/// One line of a table, split per configured column. `None` is an empty cell.
pub type RawRow = Vec<Option<String>>;

/// Character span `[start, end)` on a line.
type Span = (usize, usize);

/// Header positions, one per configured column. Optional columns missing from
/// the header have no span and never receive cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    spans: Vec<Option<Span>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

fn char_span(line: &str, start: usize, end: usize) -> Span {
    let start_col = line[..start].chars().count();
    (start_col, start_col + line[start..end].chars().count())
}

/// `\b` only where the name starts or ends with a word character.
fn header_pattern(name: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if name.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let tail = if name.chars().next_back().is_some_and(is_word) { r"\b" } else { "" };
    format!("{lead}{}{tail}", regex::escape(name))
}

/// Chunks are runs of non-space text joined by fewer than `tolerance` spaces.
fn cell_pattern(tolerance: usize) -> String {
    match tolerance.max(1) {
        1 => r"\S+".to_string(),
        t => format!(r"\S+(?:\s{{1,{}}}\S+)*", t - 1),
    }
}

/// Line tokenizer for one table, with its patterns compiled once.
#[derive(Debug, Clone)]
pub struct TableScanner {
    cell_re: Regex,
    header_res: Vec<Regex>,
    columns: Vec<ColumnOptions>,
    footers: Vec<String>,
    include_footer: bool,
}

impl TableScanner {
    pub fn new(options: &TableOptions) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::config(format!("table pattern '{pattern}': {e}")))
        };
        Ok(Self {
            cell_re: compile(&cell_pattern(options.word_join_tolerance))?,
            header_res: options
                .columns
                .iter()
                .map(|c| compile(&header_pattern(&c.name)))
                .collect::<Result<_>>()?,
            columns: options.columns.clone(),
            footers: options.footers.clone(),
            include_footer: options.include_footer,
        })
    }

    /// Recognize a header line: every required column name must appear on it
    /// as a whole word. Names never share characters on the line.
    pub fn locate_header(&self, line: &str) -> Option<HeaderLayout> {
        let mut claimed: Vec<Span> = Vec::new();
        let mut spans = Vec::with_capacity(self.columns.len());

        for (col, re) in self.columns.iter().zip(&self.header_res) {
            let found = re
                .find_iter(line)
                .map(|m| char_span(line, m.start(), m.end()))
                .find(|&(start, end)| !claimed.iter().any(|&(s, e)| start < e && s < end));
            match found {
                Some(span) => {
                    claimed.push(span);
                    spans.push(Some(span));
                }
                None if col.required => return None,
                None => spans.push(None),
            }
        }

        Some(HeaderLayout { spans })
    }

    pub fn split_cells(&self, line: &str) -> Vec<Chunk> {
        self.cell_re
            .find_iter(line)
            .map(|m| {
                let (start, end) = char_span(line, m.start(), m.end());
                Chunk {
                    start,
                    end,
                    text: m.as_str().to_string(),
                }
            })
            .collect()
    }

    /// Collect table lines from a page of text. Returns `None` when no header
    /// was found. A footer line closes the table; a later header reopens it.
    pub fn extract_rows(&self, text: &str) -> Option<Vec<RawRow>> {
        let mut layout: Option<HeaderLayout> = None;
        let mut found = false;
        let mut rows = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(header) = self.locate_header(line) {
                layout = Some(header);
                found = true;
                continue;
            }
            let Some(current) = &layout else {
                continue;
            };

            let cells = self.split_cells(line);
            if self.footers.iter().any(|f| line.contains(f.as_str())) {
                if self.include_footer {
                    rows.push(current.assign(&cells));
                }
                layout = None;
                continue;
            }
            rows.push(current.assign(&cells));
        }

        found.then_some(rows)
    }
}

impl HeaderLayout {
    fn column_for(&self, chunk: &Chunk) -> Option<usize> {
        self.spans
            .iter()
            .enumerate()
            .filter_map(|(i, span)| span.map(|s| (i, s)))
            .min_by_key(|&(_, (s, e))| {
                let overlap = e.min(chunk.end).saturating_sub(s.max(chunk.start));
                let gap = if overlap > 0 {
                    0
                } else {
                    s.max(chunk.start) - e.min(chunk.end)
                };
                (std::cmp::Reverse(overlap), gap)
            })
            .map(|(i, _)| i)
    }

    /// Place each chunk under the header it overlaps most, or the nearest one.
    pub fn assign(&self, chunks: &[Chunk]) -> RawRow {
        let mut row: RawRow = vec![None; self.spans.len()];
        for chunk in chunks {
            if let Some(col) = self.column_for(chunk) {
                match &mut row[col] {
                    Some(text) => {
                        text.push(' ');
                        text.push_str(&chunk.text);
                    }
                    cell @ None => *cell = Some(chunk.text.clone()),
                }
            }
        }
        row
    }
}
