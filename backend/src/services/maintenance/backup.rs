//! `POST /api/maintenance/backup`.
//!
//! Copies the ledger into the backup directory. The optional `target` is a
//! bare file name; anything that would leave the backup directory is refused.

use crate::ledger::LedgerState;
use crate::services::ledger_error_response;
use actix_web::{web, HttpResponse};
use common::requests::BackupRequest;
use std::path::{Component, Path, PathBuf};

pub async fn process(
    state: web::Data<LedgerState>,
    request: Option<web::Json<BackupRequest>>,
) -> HttpResponse {
    let target = request.and_then(|r| r.into_inner().target);
    let ledger = state.ledger.lock().await;

    let target = match target.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        None => None,
        Some(name) => match backup_target(&ledger.store().backup_dir(), name) {
            Some(path) => Some(path),
            None => {
                return HttpResponse::BadRequest()
                    .body(format!("Invalid backup file name: {}", name))
            }
        },
    };

    match ledger.backup(target.as_deref()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => ledger_error_response(&e),
    }
}

/// `name` joined onto `dir`, provided it is a single plain path component.
pub(crate) fn backup_target(dir: &Path, name: &str) -> Option<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file)), None) => Some(dir.join(file)),
        _ => None,
    }
}
