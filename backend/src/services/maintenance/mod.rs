//! Maintenance routes under `/api/maintenance`.
//!
//! - `POST /backup`: copies the ledger file and reports the copy's path, size
//!   and MD5 digest. Body `{ "target": "name.xlsx" }` is optional.
//! - `GET /validate`: whether the ledger parses and where its header row is.

mod backup;
mod validate;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/maintenance";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/backup", post().to(backup::process))
        .route("/validate", get().to(validate::process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::store::BackupReport;
    use crate::services::test_support::ledger_state;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{web, App};
    use common::model::field::Field;
    use common::responses::FileValidation;
    use serde_json::json;
    use std::fs;

    #[actix_web::test]
    async fn backup_copies_the_ledger() {
        let (dir, state) = ledger_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/maintenance/backup")
            .set_json(json!({ "target": "copy.xlsx" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        let report: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let copy = dir.path().join("copy.xlsx");
        assert_eq!(report["path"], json!(copy.display().to_string()));
        assert_eq!(
            fs::read(&copy).unwrap(),
            fs::read(dir.path().join("ledger.xlsx")).unwrap()
        );

        let req = actix_test::TestRequest::post()
            .uri("/api/maintenance/backup")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with("backup_")
            })
            .count();
        assert_eq!(backups, 1);

        let req = actix_test::TestRequest::post()
            .uri("/api/maintenance/backup")
            .set_json(json!({ "target": "../escape.xlsx" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn validate_reports_header_layout() {
        let (dir, state) = ledger_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/api/maintenance/validate")
            .to_request();
        let report: FileValidation = actix_test::call_and_read_body_json(&app, req).await;
        assert!(report.valid);
        assert_eq!(report.header_row, Some(1));
        assert_eq!(report.mapped_fields, Field::ALL.to_vec());

        fs::write(dir.path().join("ledger.xlsx"), b"garbage").unwrap();
        let req = actix_test::TestRequest::get()
            .uri("/api/maintenance/validate")
            .to_request();
        let report: FileValidation = actix_test::call_and_read_body_json(&app, req).await;
        assert!(!report.valid);
        assert_eq!(report.header_row, None);
    }

    #[test]
    fn backup_report_serializes_path_as_string() {
        let report = BackupReport {
            path: "/tmp/backup.xlsx".into(),
            bytes: 10,
            md5: "abc".into(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["path"], "/tmp/backup.xlsx");
        assert_eq!(value["bytes"], 10);
    }
}
