use crate::ledger::LedgerState;
use crate::services::customers::PHONE_REQUIRED;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};
use common::requests::UpdateCustomerRequest;

/// Handler for `POST /api/customers/update`.
///
/// `old` locates the row by natural key; the fields present in `new` are
/// applied on top of it. Answers `404 Not Found` when no row has `old`'s key.
pub async fn process(
    state: web::Data<LedgerState>,
    request: web::Json<UpdateCustomerRequest>,
) -> HttpResponse {
    let UpdateCustomerRequest { old, new } = request.into_inner();
    let phone = new.phone.as_deref().unwrap_or(&old.phone);
    if phone.trim().is_empty() {
        return HttpResponse::BadRequest().body(PHONE_REQUIRED);
    }

    let mut ledger = state.ledger.lock().await;
    match ledger.update(&old, new) {
        Ok(customer) => HttpResponse::Ok().json(customer),
        Err(e) => ledger_error_response(&e),
    }
}
