use crate::services::print::pdf::{configure_document, grid, push_title, render};
use crate::services::query_suffix;
use chrono::{DateTime, Local};
use common::model::customer::Customer;
use genpdf::elements::{Break, Paragraph};
use genpdf::PaperSize;
use std::error::Error;
use std::path::Path;

const TABLE_HEADERS: [&str; 7] = [
    "#",
    "Phone",
    "Customer Name",
    "Apt No",
    "Address",
    "Suburb",
    "Postal Code",
];

const BATCH_HEADERS: [&str; 6] = [
    "Phone",
    "Customer Name",
    "Apt No",
    "Address",
    "Suburb",
    "Postal Code",
];

/// Rows of the customer list, numbered from 1.
pub fn table_rows(customers: &[Customer]) -> Vec<Vec<String>> {
    customers
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let mut row = vec![(idx + 1).to_string()];
            row.extend(batch_row(c));
            row
        })
        .collect()
}

fn batch_row(c: &Customer) -> Vec<String> {
    vec![
        c.phone.clone(),
        c.name.clone(),
        c.apartment_no.clone(),
        c.address.clone(),
        c.suburb.clone(),
        c.postal_code.clone(),
    ]
}

/// `customer_table[_<query>]_<YYYYmmdd_HHMMSS>.pdf`
pub fn table_filename(query: &str, now: DateTime<Local>) -> String {
    format!(
        "customer_table{}_{}.pdf",
        query_suffix(query),
        now.format("%Y%m%d_%H%M%S")
    )
}

/// `selected_customers_<YYYYmmdd_HHMMSS>.pdf`
pub fn batch_filename(now: DateTime<Local>) -> String {
    format!("selected_customers_{}.pdf", now.format("%Y%m%d_%H%M%S"))
}

/// The customer list, captioned with the search that produced it.
pub fn render_table(
    fonts_dir: &Path,
    customers: &[Customer],
    query: &str,
    now: DateTime<Local>,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut doc = configure_document(fonts_dir, "Customer list", PaperSize::Letter)?;
    push_title(&mut doc, "CUSTOMER LIST");
    doc.push(Paragraph::new(format!(
        "Generated: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )));
    let query = query.trim();
    if !query.is_empty() {
        doc.push(Paragraph::new(format!("Search Query: \"{}\"", query)));
    }
    doc.push(Break::new(1));

    if customers.is_empty() {
        doc.push(Paragraph::new("No customers found."));
    } else {
        doc.push(grid(
            vec![2, 5, 8, 3, 10, 5, 3],
            &TABLE_HEADERS,
            &table_rows(customers),
            8,
        )?);
        doc.push(Break::new(1));
        doc.push(Paragraph::new(format!("Total Customers: {}", customers.len())));
    }
    render(doc)
}

/// One table of the selected customers on A4.
pub fn render_batch(
    fonts_dir: &Path,
    customers: &[Customer],
    now: DateTime<Local>,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut doc = configure_document(fonts_dir, "Selected customers", PaperSize::A4)?;
    push_title(&mut doc, "Selected Customers Delivery Report");
    doc.push(Paragraph::new(format!(
        "Generated on: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )));
    doc.push(Break::new(1));

    let rows: Vec<Vec<String>> = customers.iter().map(batch_row).collect();
    doc.push(grid(vec![5, 7, 3, 9, 5, 4], &BATCH_HEADERS, &rows, 8)?);
    render(doc)
}
