//! Header discovery and column mapping.
//!
//! Ledger files are edited by hand, so neither the header position nor the
//! column order is fixed. Discovery runs in two phases: find the header row
//! among the first few rows, then bind each logical field to the column whose
//! header text matches it. Everything that asks "where is field X" goes through
//! the resulting [`ColumnMap`].

use crate::ledger::sheet::{Row, Sheet};
use common::model::customer::normalize;
use common::model::field::Field;
use std::collections::HashMap;

/// How many leading rows may hold the header.
pub const MAX_HEADER_SCAN: usize = 5;

/// Label sets a header row can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Labels {
    /// Headers of the ledger workbook (`PHONE`, `CUSTOMER NAME`, ...).
    Ledger,
    /// Headers written by the CSV/XLSX exports (`Phone`, `Customer Name`, ...).
    Export,
}

impl Labels {
    pub fn label(self, field: Field) -> &'static str {
        match self {
            Labels::Ledger => field.ledger_header(),
            Labels::Export => field.export_label(),
        }
    }

    /// The label whose presence marks a row as the header row.
    pub fn anchor(self) -> &'static str {
        self.label(Field::Phone)
    }
}

/// Index of the first of the leading `max_scan` rows holding a `PHONE` cell.
pub fn locate_header_row(rows: &[Row], max_scan: usize) -> Option<usize> {
    locate_header_row_by(rows, Labels::Ledger.anchor(), max_scan)
}

pub fn locate_header_row_by(rows: &[Row], anchor: &str, max_scan: usize) -> Option<usize> {
    rows.iter().take(max_scan).position(|row| {
        row.iter()
            .flatten()
            .any(|cell| cell.text().trim() == anchor)
    })
}

/// Logical field to physical column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: HashMap<Field, usize>,
}

impl ColumnMap {
    /// Maps the ledger headers found in `header_row`.
    pub fn build(header_row: &Row) -> Self {
        Self::build_with(header_row, Labels::Ledger)
    }

    /// Maps each field to the first cell whose trimmed text equals its label.
    /// Fields without a matching cell are left out.
    pub fn build_with(header_row: &Row, labels: Labels) -> Self {
        let columns = Field::ALL
            .into_iter()
            .filter_map(|field| {
                let label = labels.label(field);
                header_row
                    .iter()
                    .position(|cell| {
                        cell.as_ref()
                            .is_some_and(|c| c.text().trim() == label)
                    })
                    .map(|idx| (field, idx))
            })
            .collect();
        ColumnMap { columns }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Mapped fields in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|idx| (field, idx)))
    }

    /// Normalized value of `field` in `row`; `None` for an unmapped field or an
    /// empty cell.
    pub fn read(&self, row: &Row, field: Field) -> Option<String> {
        let col = self.get(field)?;
        row.get(col)
            .and_then(|cell| cell.as_ref())
            .map(|cell| normalize(&cell.text()))
    }

    /// Normalized values of every mapped, non-empty cell in `row`.
    pub fn values(&self, row: &Row) -> HashMap<Field, String> {
        self.iter()
            .filter_map(|(field, _)| self.read(row, field).map(|v| (field, v)))
            .collect()
    }
}

/// Where the header sits in a sheet and what it maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub row: usize,
    pub columns: ColumnMap,
}

impl HeaderLayout {
    pub fn discover(sheet: &Sheet, labels: Labels) -> Option<Self> {
        let row = locate_header_row_by(&sheet.rows, labels.anchor(), MAX_HEADER_SCAN)?;
        let columns = ColumnMap::build_with(&sheet.rows[row], labels);
        Some(HeaderLayout { row, columns })
    }

    /// Indexes of the data rows below the header.
    pub fn data_rows(&self, sheet: &Sheet) -> std::ops::Range<usize> {
        (self.row + 1)..sheet.rows.len().max(self.row + 1)
    }
}
