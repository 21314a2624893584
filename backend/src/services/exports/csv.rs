use crate::ledger::sheet::{Cell, Sheet};
use crate::services::exports::{export_headers, parse_export, ExportError};
use common::model::customer::Customer;
use common::model::field::Field;

/// Comma-separated export: one header line, then one line per customer, all
/// stamped with the same `export_date`.
pub fn write(customers: &[Customer], export_date: &str) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(export_headers())?;
    for customer in customers {
        let mut record: Vec<&str> = Field::ALL.iter().map(|&f| customer.get(f)).collect();
        record.push(export_date);
        writer.write_record(&record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Reads customers back from a CSV export.
pub fn read_customers(bytes: &[u8]) -> Result<Vec<Customer>, ExportError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut sheet = Sheet::new("Export");
    for (row, record) in reader.records().enumerate() {
        for (col, value) in record?.iter().enumerate() {
            if !value.is_empty() {
                sheet.set(row, col, Some(Cell::Text(value.to_string())));
            }
        }
    }
    Ok(parse_export(&sheet))
}
