use crate::ledger::LedgerState;
use crate::services::customers::PHONE_REQUIRED;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};
use common::model::customer::CustomerForm;

/// Handler for `POST /api/customers/add`.
///
/// The ledger accepts records without a phone, but such rows are never listed,
/// so the form insists on one.
///
/// # Returns
/// - `200 OK` with the stored `Customer`.
/// - `400 Bad Request` when the phone, name or address is blank.
/// - `503 Service Unavailable` when the ledger file cannot be written.
pub async fn process(state: web::Data<LedgerState>, form: web::Json<CustomerForm>) -> HttpResponse {
    let form = form.into_inner();
    if form.phone.as_deref().is_none_or(|p| p.trim().is_empty()) {
        return HttpResponse::BadRequest().body(PHONE_REQUIRED);
    }

    let mut ledger = state.ledger.lock().await;
    match ledger.add(form) {
        Ok(customer) => HttpResponse::Ok().json(customer),
        Err(e) => ledger_error_response(&e),
    }
}
