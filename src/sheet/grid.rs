//! Worksheet cells and date handling

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use super::error::SheetError;

static SEPARATED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[./-](\d{1,2})[./-](\d{1,2})(?:[ T].*)?$").unwrap());
static CHINESE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})年(\d{1,2})月(\d{1,2})日$").unwrap());

/// Serial number of 9999-12-31, the last date Excel can display.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// A worksheet cell, reduced to the value kinds the importers care about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

/// Rows of cells, top to bottom, with absolute sheet positions kept.
pub type Grid = Vec<Vec<Cell>>;

pub(crate) static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form: trimmed text, integral numbers without a fraction,
    /// ISO dates.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    /// Leading integer of the cell, if any.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Cell::Number(n) if *n >= 0.0 => Some(*n as u32),
            Cell::Text(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .take_while(|ch| ch.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
                Cell::Text(text.clone())
            }
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => {
                excel_serial_date(dt.as_f64()).map_or(Cell::Number(dt.as_f64()), Cell::Date)
            }
        }
    }
}

/// Date for an Excel 1900-system serial number.
///
/// Serial 60 is the nonexistent 1900-02-29; serials below it are shifted by
/// one day to match how spreadsheets display them. Serials past 9999-12-31
/// (ID numbers typed into a date column, say) are not dates.
pub fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64;
    let base = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    base.checked_add_signed(Duration::try_days(days)?)
}

/// Interpret a cell as a date: native dates, Excel serial numbers, and
/// `YYYY.MM.DD`, `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYY年M月D日` text.
pub fn parse_cell_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(n) => excel_serial_date(*n),
        Cell::Text(text) => {
            let text = text.trim();
            let caps = SEPARATED_DATE
                .captures(text)
                .or_else(|| CHINESE_DATE.captures(text))?;
            NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )
        }
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Rows start at the first used row, where the column labels are. Cells keep
/// their worksheet column, so a sheet starting at column B has an empty
/// first cell in every row.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let first_col = range.start().map_or(0, |(_, col)| col as usize);
    range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; first_col];
            cells.extend(row.iter().map(Cell::from));
            cells
        })
        .collect()
}

/// Read the first worksheet of an `.xlsx`/`.xls`/`.ods` workbook.
pub fn read_first_sheet(path: &Path) -> Result<Grid, SheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoWorksheet)?;
    let range = workbook.worksheet_range(&name)?;

    let grid = range_to_grid(&range);
    tracing::debug!(sheet = %name, rows = grid.len(), "read worksheet");
    Ok(grid)
}
