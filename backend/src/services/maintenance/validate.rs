use crate::ledger::LedgerState;
use actix_web::{web, HttpResponse};
use common::responses::FileValidation;

/// Handler for `GET /api/maintenance/validate`.
///
/// Always answers `200 OK`; `valid` is false when the ledger cannot be read or
/// has no header row in its first rows.
pub async fn process(state: web::Data<LedgerState>) -> HttpResponse {
    let ledger = state.ledger.lock().await;
    let path = ledger.store().path().display().to_string();
    let report = match ledger.validate_file() {
        Ok(layout) => FileValidation {
            valid: true,
            path,
            header_row: Some(layout.row + 1),
            mapped_fields: layout.columns.iter().map(|(field, _)| field).collect(),
        },
        Err(_) => FileValidation {
            valid: false,
            path,
            header_row: None,
            mapped_fields: Vec::new(),
        },
    };
    HttpResponse::Ok().json(report)
}
