//! In-memory copy of the ledger worksheet.
//!
//! The workbook is read with `calamine` into a grid that keeps every cell at its
//! physical position (leading blank rows and columns included), so header
//! discovery sees the layout the user sees. Writes go through `rust_xlsxwriter`:
//! the whole grid is serialized to memory, written next to the ledger and then
//! renamed over it, which keeps the previous file intact if anything fails.
//!
//! Date and time cells keep their Excel serial value and are written back with
//! a date/time number format, so a rewrite leaves them as dates and times.
//! Serials are read in the 1900 date system.

use crate::ledger::error::StoreFailure;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

/// Name given to the worksheet of a freshly created ledger.
pub const DEFAULT_SHEET_NAME: &str = "Customers";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A non-empty cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel date/time serial: whole days since 1899-12-30 plus the fraction
    /// of a day.
    DateTime(f64),
}

impl Cell {
    /// Cell content as text, the way it appears in the spreadsheet.
    ///
    /// Whole numbers lose their `.0` so a numeric phone or postcode reads back
    /// as it was typed.
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Cell::DateTime(serial) => match datetime_from_serial(*serial) {
                Some(dt) => dt.format(serial_layout(*serial, &dt).0).to_string(),
                None => serial.to_string(),
            },
        }
    }
}

fn datetime_from_serial(serial: f64) -> Option<NaiveDateTime> {
    let seconds = (serial * SECONDS_PER_DAY).round();
    if !seconds.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(TimeDelta::try_seconds(seconds as i64)?)
}

/// chrono pattern and Excel number format for a serial: a time of day, a
/// calendar date, or both.
fn serial_layout(serial: f64, dt: &NaiveDateTime) -> (&'static str, &'static str) {
    let has_date = serial.trunc() != 0.0;
    let has_time = dt.num_seconds_from_midnight() != 0;
    let has_seconds = dt.second() != 0;
    match (has_date, has_time, has_seconds) {
        (true, false, _) => ("%Y-%m-%d", "yyyy-mm-dd"),
        (true, true, false) => ("%Y-%m-%d %H:%M", "yyyy-mm-dd hh:mm"),
        (true, true, true) => ("%Y-%m-%d %H:%M:%S", "yyyy-mm-dd hh:mm:ss"),
        (false, _, false) => ("%H:%M", "hh:mm"),
        (false, _, true) => ("%H:%M:%S", "hh:mm:ss"),
    }
}

fn serial_number_format(serial: f64) -> &'static str {
    datetime_from_serial(serial)
        .map(|dt| serial_layout(serial, &dt).1)
        .unwrap_or("General")
}

fn cell_from_data(data: &Data) -> Option<Cell> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::Bool(b) => Some(Cell::Bool(*b)),
        Data::DateTime(dt) => Some(Cell::DateTime(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
    }
}

pub type Row = Vec<Option<Cell>>;

/// The first worksheet of a workbook as a ragged grid of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Reads the first worksheet of the workbook at `path`.
    pub fn read(path: &Path) -> Result<Self, StoreFailure> {
        if !path.exists() {
            return Err(StoreFailure::Missing(path.to_path_buf()));
        }
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        Self::from_workbook(&mut workbook)
    }

    /// Reads the first worksheet of an in-memory workbook.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreFailure> {
        let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        Self::from_workbook(&mut workbook)
    }

    fn from_workbook<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<Self, StoreFailure> {
        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(StoreFailure::NoWorksheet)?;
        let range = workbook.worksheet_range(&name)?;
        Ok(Self::from_range(&name, &range))
    }

    fn from_range(name: &str, range: &Range<Data>) -> Self {
        let mut sheet = Sheet::new(name);
        let Some((first_row, first_col)) = range.start() else {
            return sheet;
        };

        sheet.rows = vec![Vec::new(); first_row as usize];
        for row in range.rows() {
            let mut cells: Row = vec![None; first_col as usize];
            cells.extend(row.iter().map(cell_from_data));
            while matches!(cells.last(), Some(None)) {
                cells.pop();
            }
            sheet.rows.push(cells);
        }
        sheet
    }

    /// Text of the cell at (`row`, `col`); `None` when empty or out of range.
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .and_then(|cell| cell.as_ref())
            .map(Cell::text)
    }

    /// Overwrites a cell, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: Option<Cell>) {
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        cells[col] = value;
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.name)?;

        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (r, c) = (row_idx as u32, col_idx as u16);
                match cell {
                    None => {}
                    Some(Cell::Text(s)) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    Some(Cell::Number(n)) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Some(Cell::Bool(b)) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                    Some(Cell::DateTime(serial)) => {
                        let format = Format::new().set_num_format(serial_number_format(*serial));
                        worksheet.write_number_with_format(r, c, *serial, &format)?;
                    }
                }
            }
        }

        workbook.save_to_buffer()
    }

    /// Replaces the file at `path` with this grid.
    ///
    /// The workbook is fully serialized before the ledger is touched, and the
    /// final step is a rename, so readers never observe a half-written file.
    pub fn write(&self, path: &Path) -> Result<(), StoreFailure> {
        let bytes = self.to_xlsx()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = tmp_path_for(path);
        fs::write(&tmp_path, &bytes)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
