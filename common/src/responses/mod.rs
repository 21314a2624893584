use crate::model::customer::Customer;
use crate::model::field::Field;
use serde::{Deserialize, Serialize};

/// Body of `GET /api/customers` and `POST /api/customers/refresh`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    /// Records loaded from the ledger, before filtering.
    pub total: usize,
    pub query: String,
}

/// Body of `GET /api/maintenance/validate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileValidation {
    pub valid: bool,
    pub path: String,
    /// 1-based spreadsheet row of the header, when one was found.
    #[serde(default)]
    pub header_row: Option<usize>,
    #[serde(default)]
    pub mapped_fields: Vec<Field>,
}
