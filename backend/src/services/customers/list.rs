//! `GET /api/customers` and `POST /api/customers/refresh`.
//!
//! Listing ranks the cached records against `q` and remembers the query, so
//! later mutations re-apply it. Refresh rereads the ledger file first, picking
//! up edits made outside the app.

use crate::ledger::facade::Ledger;
use crate::ledger::LedgerState;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};
use common::requests::SearchQuery;
use common::responses::CustomerList;

pub async fn process(state: web::Data<LedgerState>, query: web::Query<SearchQuery>) -> HttpResponse {
    let mut ledger = state.ledger.lock().await;
    ledger.search(&query.q);
    HttpResponse::Ok().json(current_view(&ledger))
}

pub async fn refresh(state: web::Data<LedgerState>) -> HttpResponse {
    let mut ledger = state.ledger.lock().await;
    if let Err(e) = ledger.reload() {
        return ledger_error_response(&e);
    }
    HttpResponse::Ok().json(current_view(&ledger))
}

pub(crate) fn current_view(ledger: &Ledger) -> CustomerList {
    CustomerList {
        customers: ledger.filtered_records().to_vec(),
        total: ledger.all_records().len(),
        query: ledger.query().to_string(),
    }
}
