use crate::model::customer::{Customer, CustomerForm};
use serde::{Deserialize, Serialize};

/// Query string of the customer list endpoint.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Payload of `POST /api/customers/update`.
///
/// `old` is only used to locate the row by its natural key; `new` replaces the
/// row's mapped cells.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCustomerRequest {
    pub old: Customer,
    pub new: CustomerForm,
}

/// Records selected in the UI together with the search that produced them.
///
/// Shared by the export and print endpoints; `query` is only used for captions
/// and file names.
#[derive(Debug, Deserialize, Serialize)]
pub struct SelectionRequest {
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub query: String,
}

/// Payload of `POST /api/maintenance/backup`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackupRequest {
    #[serde(default)]
    pub target: Option<String>,
}
