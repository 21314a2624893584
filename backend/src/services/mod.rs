//! HTTP API of the ledger.
//!
//! Each sub-module exposes a `configure_routes()` returning the Actix `Scope`
//! for its path prefix; `main.rs` mounts them all in front of the embedded UI.

pub mod customers;
pub mod exports;
pub mod maintenance;
pub mod print;

use crate::ledger::error::{LedgerError, StoreFailure};
use actix_web::HttpResponse;

/// Maps a ledger failure to the response shown by the UI.
///
/// Validation messages are shown verbatim. Store failures were already logged
/// with their cause, so the client only gets a generic message.
pub(crate) fn ledger_error_response(err: &LedgerError) -> HttpResponse {
    match err {
        LedgerError::Validation(e) => HttpResponse::BadRequest().body(e.to_string()),
        LedgerError::Store(e @ StoreFailure::NotFound(_)) => {
            HttpResponse::NotFound().body(e.to_string())
        }
        LedgerError::Store(StoreFailure::HeaderNotFound(_)) => HttpResponse::ServiceUnavailable()
            .body("The ledger file has no PHONE header row; check the file layout"),
        LedgerError::Store(_) => HttpResponse::ServiceUnavailable()
            .body("The ledger file could not be accessed; see the server log"),
    }
}

/// `text` made safe for a download file name: anything but letters, digits,
/// `-` and `.` becomes `_`.
pub(crate) fn filename_part(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `_<query>` for a non-blank query, nothing otherwise.
pub(crate) fn query_suffix(query: &str) -> String {
    let part = filename_part(query);
    if part.is_empty() {
        String::new()
    } else {
        format!("_{}", part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_parts_replace_unsafe_characters() {
        assert_eq!(filename_part("Ann Smith"), "Ann_Smith");
        assert_eq!(filename_part(" Unit 4/12 \"Main\" "), "Unit_4_12__Main_");
        assert_eq!(query_suffix("  "), "");
        assert_eq!(query_suffix("high st"), "_high_st");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ledger::facade::Ledger;
    use crate::ledger::store::SpreadsheetStore;
    use crate::ledger::LedgerState;
    use common::model::customer::CustomerForm;
    use tempfile::TempDir;

    pub fn form(phone: &str, name: &str, address: &str) -> CustomerForm {
        CustomerForm {
            phone: Some(phone.into()),
            name: Some(name.into()),
            address: Some(address.into()),
            ..Default::default()
        }
    }

    /// A fresh ledger in a temporary directory holding Ann, Bob and Carla.
    pub fn ledger_state() -> (TempDir, LedgerState) {
        let dir = TempDir::new().unwrap();
        let store = SpreadsheetStore::new(dir.path().join("ledger.xlsx"));
        store.ensure_initialized().unwrap();
        let mut ledger = Ledger::new(store);
        ledger.add(form("0400 111", "Ann Smith", "1 High St")).unwrap();
        ledger.add(form("0400 222", "Bob Jones", "2 Low Rd")).unwrap();
        ledger.add(form("0400 333", "Carla Ann", "3 Side St")).unwrap();
        (dir, LedgerState::new(ledger))
    }
}
