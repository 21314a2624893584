use crate::ledger::LedgerState;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/customers/statistics`.
pub async fn process(state: web::Data<LedgerState>) -> HttpResponse {
    let ledger = state.ledger.lock().await;
    match ledger.statistics() {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => ledger_error_response(&e),
    }
}
