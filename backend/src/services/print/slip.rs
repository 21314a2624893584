use crate::services::filename_part;
use crate::services::print::pdf::{configure_document, grid, push_section, push_title, render};
use chrono::{DateTime, Local};
use common::model::customer::Customer;
use genpdf::elements::{Break, Paragraph};
use genpdf::PaperSize;
use std::error::Error;
use std::path::Path;

const INSTRUCTION_LINES: usize = 4;
const FOOTER: [&str; 2] = [
    "Thank you for choosing our delivery service!",
    "For questions, contact: support@deliverymanager.com",
];

/// Label/value pairs printed in the slip's customer section.
///
/// The apartment is folded into the address and the postal code into the
/// location, each only when present.
pub fn slip_details(customer: &Customer) -> Vec<(&'static str, String)> {
    let mut address = customer.address.clone();
    if !customer.apartment_no.is_empty() {
        address.push_str(&format!(", Apt {}", customer.apartment_no));
    }
    let mut location = customer.suburb.clone();
    if !customer.postal_code.is_empty() {
        location.push_str(&format!(" | Postal Code: {}", customer.postal_code));
    }
    vec![
        ("Name:", customer.name.clone()),
        ("Phone:", customer.phone.clone()),
        ("Address:", address),
        ("Location:", location),
    ]
}

/// `delivery_slip_<name>.pdf`
pub fn slip_filename(customer: &Customer) -> String {
    format!("delivery_slip_{}.pdf", filename_part(&customer.name))
}

pub fn render_slip(
    fonts_dir: &Path,
    customer: &Customer,
    now: DateTime<Local>,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut doc = configure_document(fonts_dir, "Delivery slip", PaperSize::Letter)?;
    push_title(&mut doc, "DELIVERY SLIP");
    doc.push(Paragraph::new(format!(
        "Generated: {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )));

    push_section(&mut doc, "CUSTOMER INFORMATION");
    let rows: Vec<Vec<String>> = slip_details(customer)
        .into_iter()
        .map(|(label, value)| vec![label.to_string(), value])
        .collect();
    doc.push(grid(vec![1, 3], &["Field", "Value"], &rows, 12)?);

    push_section(&mut doc, "DELIVERY INSTRUCTIONS");
    for _ in 0..INSTRUCTION_LINES {
        doc.push(Paragraph::new("_".repeat(49)));
    }

    doc.push(Break::new(2));
    for line in FOOTER {
        doc.push(Paragraph::new(line));
    }
    render(doc)
}
