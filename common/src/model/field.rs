use serde::{Deserialize, Serialize};

/// One of the seven logical columns of a customer record.
///
/// The ledger spreadsheet and the exported files label these columns
/// differently; both label sets live here so header discovery can be driven
/// by either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Phone,
    Name,
    ScheduledDelivery,
    Apartment,
    Address,
    Suburb,
    PostalCode,
}

impl Field {
    /// All fields in ledger column order.
    pub const ALL: [Field; 7] = [
        Field::Phone,
        Field::Name,
        Field::ScheduledDelivery,
        Field::Apartment,
        Field::Address,
        Field::Suburb,
        Field::PostalCode,
    ];

    /// Exact header text used in the ledger workbook.
    ///
    /// The scheduled delivery and apartment headers contain embedded line
    /// breaks because the workbook wraps them inside the header cell.
    pub fn ledger_header(self) -> &'static str {
        match self {
            Field::Phone => "PHONE",
            Field::Name => "CUSTOMER NAME",
            Field::ScheduledDelivery => "SCH   \nDEL",
            Field::Apartment => "APT\nNO",
            Field::Address => "ADDRESS",
            Field::Suburb => "SUBURB",
            Field::PostalCode => "PC",
        }
    }

    /// Column label used by the CSV and XLSX exports.
    pub fn export_label(self) -> &'static str {
        match self {
            Field::Phone => "Phone",
            Field::Name => "Customer Name",
            Field::ScheduledDelivery => "Scheduled Delivery Time",
            Field::Apartment => "Apartment No",
            Field::Address => "Address",
            Field::Suburb => "Suburb",
            Field::PostalCode => "Postal Code",
        }
    }

    /// Fields that make up the natural key.
    pub fn is_key(self) -> bool {
        matches!(self, Field::Phone | Field::Name | Field::Address)
    }
}
