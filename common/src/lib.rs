//! Types shared between the ledger backend and its browser UI.
//!
//! Nothing in this crate touches the filesystem: it only describes the customer
//! record, how its fields are labelled in the ledger spreadsheet and in exports,
//! and the payloads exchanged over the HTTP API.

pub mod model;
pub mod requests;
pub mod responses;
