use crate::ledger::sheet::Sheet;
use crate::services::exports::{export_headers, parse_export, ExportError};
use common::model::customer::Customer;
use common::model::field::Field;
use rust_xlsxwriter::{Format, Workbook};

const SHEET_NAME: &str = "Customers";

/// Single-sheet workbook with a bold header row and the same columns as the
/// CSV export.
pub fn write(customers: &[Customer], export_date: &str) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, header) in export_headers().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &bold)?;
        worksheet.set_column_width(col, header.len().max(12) as f64)?;
    }

    let date_col = Field::ALL.len() as u16;
    for (idx, customer) in customers.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, field) in Field::ALL.iter().enumerate() {
            let value = customer.get(*field);
            if !value.is_empty() {
                worksheet.write_string(row, col as u16, value)?;
            }
        }
        worksheet.write_string(row, date_col, export_date)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Reads customers back from an XLSX export.
pub fn read_customers(bytes: &[u8]) -> Result<Vec<Customer>, ExportError> {
    let sheet = Sheet::from_bytes(bytes)?;
    Ok(parse_export(&sheet))
}
