use crate::ledger::LedgerState;
use crate::services::customers::list::current_view;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};
use common::model::customer::Customer;

/// Handler for `POST /api/customers/delete`.
///
/// Removes the first row keyed like the posted record and answers with the
/// refreshed list.
pub async fn process(state: web::Data<LedgerState>, customer: web::Json<Customer>) -> HttpResponse {
    let mut ledger = state.ledger.lock().await;
    if let Err(e) = ledger.delete(&customer) {
        return ledger_error_response(&e);
    }
    HttpResponse::Ok().json(current_view(&ledger))
}
