//! # Customer Service Module
//!
//! Routes under `/api/customers` that read and edit the ledger through the
//! shared `LedgerState`.
//!
//! ## Sub-modules:
//! - `list`: the ranked, filtered customer list and the reload from file.
//! - `phone`: lookup of a single customer by phone number.
//! - `add`, `update`, `delete`: edits, each followed by a full reload.
//! - `statistics`: field coverage counts.

mod add;
mod delete;
pub(crate) mod list;
mod phone;
mod statistics;
mod update;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all customer-related API endpoints.
const API_PATH: &str = "/api/customers";

const PHONE_REQUIRED: &str = "Phone number is required";

/// Configures and returns the Actix `Scope` for the customer routes.
///
/// # Registered Routes:
///
/// *   **`GET ?q=`**: customers ranked against `q` (all of them when blank).
/// *   **`POST /refresh`**: rereads the ledger file and returns the list.
/// *   **`GET /phone/{phone}`**: the first customer with that phone.
/// *   **`POST /add`**: appends a customer; body is a `CustomerForm`.
/// *   **`POST /update`**: body is `{ "old": Customer, "new": CustomerForm }`.
/// *   **`POST /delete`**: body is the `Customer` to remove.
/// *   **`GET /statistics`**: counts of filled-in fields.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/refresh", post().to(list::refresh))
        .route("/phone/{phone}", get().to(phone::process))
        .route("/add", post().to(add::process))
        .route("/update", post().to(update::process))
        .route("/delete", post().to(delete::process))
        .route("/statistics", get().to(statistics::process))
}
