//! Tabular input: spreadsheet and CSV files flattened into rows of cells.
//!
//! RULE: Transforms never open files themselves. They consume rows from a
//! `RowSource`, so the same mapping code runs over `.xlsx`, `.csv` and
//! in-memory fixtures.

use crate::error::{HempError, HempResult};
use calamine::{open_workbook_auto, Data, Reader};
use std::io::Read;
use std::path::{Path, PathBuf};

/// A single spreadsheet cell, reduced to what the transforms care about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Numeric value, defaulting to 0 for anything missing or unparsable.
    pub fn as_number(&self) -> f64 {
        let value = match self {
            Cell::Empty => 0.0,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Cell::Bool(b) => {
                if *b { 1.0 } else { 0.0 }
            }
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Text content, or `None` for empty and whitespace-only cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(format!("{n}")),
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(field.to_string())
        }
    }

    fn from_sheet(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_field(s),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            _ => Cell::Empty,
        }
    }
}

/// Anything that can yield a header-inclusive grid of cells.
pub trait RowSource {
    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;

    /// All rows, header row included.
    fn read_rows(&mut self) -> HempResult<Vec<Vec<Cell>>>;
}

/// A spreadsheet or CSV file on disk. The format is chosen by extension.
pub struct SheetFile {
    path: PathBuf,
}

impl SheetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

impl RowSource for SheetFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_rows(&mut self) -> HempResult<Vec<Vec<Cell>>> {
        if self.is_csv() {
            let file = std::fs::File::open(&self.path)?;
            read_csv_rows(file)
        } else {
            read_workbook_rows(&self.path)
        }
    }
}

/// Rows already in memory (tests, IPC payloads).
pub struct InMemoryRows {
    pub label: String,
    pub rows:  Vec<Vec<Cell>>,
}

impl RowSource for InMemoryRows {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read_rows(&mut self) -> HempResult<Vec<Vec<Cell>>> {
        Ok(self.rows.clone())
    }
}

/// First worksheet of an `.xlsx` / `.xls` / `.ods` workbook.
pub fn read_workbook_rows(path: &Path) -> HempResult<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| HempError::EmptyWorkbook {
            path: path.display().to_string(),
        })?;
    let range = workbook.worksheet_range(&first)?;
    log::debug!(
        "{}: sheet '{first}' has {} rows",
        path.display(),
        range.height()
    );
    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from_sheet).collect())
        .collect())
}

/// Headerless, flexible CSV parse. Quoted fields may contain commas.
pub fn read_csv_rows<R: Read>(reader: R) -> HempResult<Vec<Vec<Cell>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_field).collect());
    }
    Ok(rows)
}

/// The first candidate that exists on disk.
pub fn resolve_source(candidates: &[PathBuf]) -> HempResult<PathBuf> {
    candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .ok_or_else(|| HempError::SourceNotFound {
            tried: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}
