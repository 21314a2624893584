use crate::ledger::LedgerState;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/customers/phone/{phone}`.
///
/// Returns the first record with that phone, or `404 Not Found`.
pub async fn process(state: web::Data<LedgerState>, phone: web::Path<String>) -> HttpResponse {
    let ledger = state.ledger.lock().await;
    match ledger.find_by_phone(&phone) {
        Ok(Some(customer)) => HttpResponse::Ok().json(customer),
        Ok(None) => HttpResponse::NotFound().body(format!("No customer with phone {}", phone)),
        Err(e) => ledger_error_response(&e),
    }
}
