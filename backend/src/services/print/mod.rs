//! # Print Service Module
//!
//! PDF documents for printing, served inline so the browser opens its viewer.
//!
//! ## Sub-modules:
//! - `pdf`: font loading and the document/table helpers shared by all layouts.
//! - `slip`: a delivery slip for a single customer.
//! - `table`: the customer list and the batch report for a selection.
//!
//! Rendering runs on the blocking thread pool. The fonts are read from the
//! directory in `PrintSettings`, which `main.rs` fills from the configuration.

mod pdf;
mod slip;
mod table;

use actix_web::http::header;
use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Scope};
use chrono::Local;
use common::model::customer::Customer;
use common::requests::SelectionRequest;
use log::{error, info};
use std::path::PathBuf;

const API_PATH: &str = "/api/print";

#[derive(Clone)]
pub struct PrintSettings {
    pub fonts_dir: PathBuf,
}

/// Registered routes, all answering with an inline `application/pdf`:
///
/// *   **`POST /slip`**: body is one `Customer`.
/// *   **`POST /table`**: body is a `SelectionRequest`; the query becomes the
///     caption. An empty selection prints "No customers found.".
/// *   **`POST /batch`**: body is a non-empty `SelectionRequest`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/slip", post().to(print_slip))
        .route("/table", post().to(print_table))
        .route("/batch", post().to(print_batch))
}

async fn print_slip(settings: web::Data<PrintSettings>, customer: web::Json<Customer>) -> HttpResponse {
    let customer = customer.into_inner();
    let fonts_dir = settings.fonts_dir.clone();
    let file_name = slip::slip_filename(&customer);
    let result = web::block(move || {
        slip::render_slip(&fonts_dir, &customer, Local::now()).map_err(|e| e.to_string())
    })
    .await;
    pdf_response(result, file_name)
}

async fn print_table(
    settings: web::Data<PrintSettings>,
    request: web::Json<SelectionRequest>,
) -> HttpResponse {
    let SelectionRequest { customers, query } = request.into_inner();
    let fonts_dir = settings.fonts_dir.clone();
    let now = Local::now();
    let file_name = table::table_filename(&query, now);
    let result = web::block(move || {
        table::render_table(&fonts_dir, &customers, &query, now).map_err(|e| e.to_string())
    })
    .await;
    pdf_response(result, file_name)
}

async fn print_batch(
    settings: web::Data<PrintSettings>,
    request: web::Json<SelectionRequest>,
) -> HttpResponse {
    let customers = request.into_inner().customers;
    if customers.is_empty() {
        return HttpResponse::BadRequest().body("No customers selected");
    }
    let fonts_dir = settings.fonts_dir.clone();
    let now = Local::now();
    let file_name = table::batch_filename(now);
    let result = web::block(move || {
        table::render_batch(&fonts_dir, &customers, now).map_err(|e| e.to_string())
    })
    .await;
    pdf_response(result, file_name)
}

fn pdf_response(
    result: Result<Result<Vec<u8>, String>, actix_web::error::BlockingError>,
    file_name: String,
) -> HttpResponse {
    match result {
        Ok(Ok(bytes)) => {
            info!("Generated {} ({} bytes)", file_name, bytes.len());
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", file_name),
                ))
                .body(bytes)
        }
        Ok(Err(e)) => {
            error!("Error generating {}: {}", file_name, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
        Err(e) => {
            error!("Error generating {}: {}", file_name, e);
            HttpResponse::ServiceUnavailable().body("PDF generation failed")
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::env;
    use std::iter;
    use std::path::{Path, PathBuf};

    const SYSTEM_FONT_DIRS: [&str; 3] = [
        "/usr/share/fonts/truetype/liberation",
        "/usr/share/fonts/liberation-sans",
        "/usr/share/fonts/liberation",
    ];

    /// First directory with loadable Arial or LiberationSans files:
    /// `LEDGER_FONTS_DIR`, then `backend/fonts`, then the usual system paths.
    pub fn fonts_dir() -> Option<PathBuf> {
        let configured = env::var_os("LEDGER_FONTS_DIR").map(PathBuf::from);
        let local = Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts");
        configured
            .into_iter()
            .chain(iter::once(local))
            .chain(SYSTEM_FONT_DIRS.iter().map(PathBuf::from))
            .find(|dir| super::pdf::load_font(dir).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;
    use serde_json::json;
    use tempfile::TempDir;

    #[actix_web::test]
    async fn print_failures_are_reported() {
        let fonts = TempDir::new().unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(PrintSettings {
                    fonts_dir: fonts.path().to_path_buf(),
                }))
                .service(configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/print/batch")
            .set_json(json!({ "customers": [] }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::post()
            .uri("/api/print/slip")
            .set_json(json!({ "phone": "1", "name": "Ann", "address": "1 St" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn slip_is_served_inline() {
        let Some(fonts_dir) = test_support::fonts_dir() else {
            eprintln!("skipping slip_is_served_inline: no Arial or LiberationSans fonts found");
            return;
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(PrintSettings { fonts_dir }))
                .service(configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/print/slip")
            .set_json(json!({ "phone": "1", "name": "Ann Smith", "address": "1 St" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "inline; filename=\"delivery_slip_Ann_Smith.pdf\""
        );
        let body = actix_test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF"));
    }
}
