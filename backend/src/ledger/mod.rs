//! The customer ledger: a spreadsheet file treated as a small database.
//!
//! - `sheet`: reads the first worksheet into a grid and writes it back atomically.
//! - `header`: finds the header row and maps logical fields to columns.
//! - `store`: `SpreadsheetStore`, the load/add/update/delete/backup operations.
//! - `ranker`: orders search results.
//! - `facade`: `Ledger`, the cached view shared by the HTTP handlers.
//!
//! `LedgerState` is created in `main.rs` and injected into the Actix app as
//! `web::Data`. Its mutex serializes every call into the store, so two requests
//! never read-modify-write the file at the same time.

pub mod error;
pub mod facade;
pub mod header;
pub mod ranker;
pub mod sheet;
pub mod store;

use crate::ledger::facade::Ledger;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct LedgerState {
    pub ledger: Arc<Mutex<Ledger>>,
}

impl LedgerState {
    pub fn new(ledger: Ledger) -> Self {
        LedgerState {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }
}
