use common::model::customer::Customer;
use std::fmt::Write;

const RULE_WIDTH: usize = 50;
const SEPARATOR_WIDTH: usize = 20;

/// Plain-text listing meant for reading, not for re-import.
///
/// Apartment and scheduled delivery lines only appear for customers that
/// have them.
pub fn write(customers: &[Customer], export_date: &str) -> Vec<u8> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "DELIVERY MANAGER - CUSTOMER EXPORT");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Export Date: {}", export_date);
    let _ = writeln!(out, "Total Customers: {}", customers.len());
    let _ = writeln!(out, "{}\n", rule);

    for (idx, customer) in customers.iter().enumerate() {
        let _ = writeln!(out, "CUSTOMER {}", idx + 1);
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(out, "Name: {}", customer.name);
        let _ = writeln!(out, "Phone: {}", customer.phone);
        let _ = writeln!(out, "Address: {}", customer.address);
        if !customer.apartment_no.is_empty() {
            let _ = writeln!(out, "Apartment: {}", customer.apartment_no);
        }
        let _ = writeln!(out, "Suburb: {}", customer.suburb);
        let _ = writeln!(out, "Postal Code: {}", customer.postal_code);
        if !customer.scheduled_delivery_time.is_empty() {
            let _ = writeln!(out, "Scheduled Delivery: {}", customer.scheduled_delivery_time);
        }
        out.push('\n');
    }

    out.into_bytes()
}
