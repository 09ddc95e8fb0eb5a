//! Header-skip, fixed-column-order delimited tables.
//!
//! Columns are addressed by position, never by header text: the header rows
//! of human-edited sheets drift, the column order does not.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tally_core::{Error, Result};

/// One data row. Blank cells are `None`; others are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    line: usize,
    cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<Option<String>>) -> Self {
        Self { line, cells }
    }

    /// Line in the source file (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn owned(&self, index: usize) -> Option<String> {
        self.cell(index).map(str::to_string)
    }

    /// A cell that must be present.
    pub fn required(&self, index: usize, column: &str) -> Result<&str> {
        self.cell(index)
            .ok_or_else(|| Error::parse(format!("line {}: missing value for '{column}'", self.line)))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    source: String,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Read a delimited file, skipping `skip_rows` leading records.
    pub fn read_path(path: impl AsRef<Path>, skip_rows: usize, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(file, path.display().to_string(), skip_rows, delimiter)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        source: impl Into<String>,
        skip_rows: usize,
        delimiter: u8,
    ) -> Result<Self> {
        let source = source.into();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate().skip(skip_rows) {
            let record = result.map_err(|e| Error::parse(format!("{source}: {e}")))?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 1);
            let row = RawRow::new(line, record.iter().map(clean_cell).collect());
            if !row.is_blank() {
                rows.push(row);
            }
        }

        Ok(Self { source, rows })
    }

    /// Build a table from in-memory cells (no header).
    pub fn from_rows<R, C>(source: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| {
                RawRow::new(i + 1, cells.into_iter().map(|c| clean_cell(c.as_ref())).collect())
            })
            .filter(|r| !r.is_blank())
            .collect();
        Self {
            source: source.into(),
            rows,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
