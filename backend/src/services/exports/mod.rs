//! # Export Service Module
//!
//! Turns a selection of customers into a downloadable CSV, XLSX or TXT file.
//! The client posts the records it is showing (usually the current search
//! result) together with the query, which only feeds the file name.
//!
//! CSV and XLSX exports use the export labels (`Phone`, `Customer Name`, ...)
//! plus an `Export Date` column, and can be read back with the `read_customers`
//! functions through the same header discovery the ledger uses.

pub mod csv;
pub mod txt;
pub mod xlsx;

use crate::ledger::error::StoreFailure;
use crate::ledger::header::{HeaderLayout, Labels};
use crate::ledger::sheet::Sheet;
use crate::ledger::store::parse_customers;
use crate::services::query_suffix;
use actix_web::http::header;
use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Scope};
use chrono::{DateTime, Local};
use common::model::customer::Customer;
use common::model::export::{ExportFormat, ExportSummary};
use common::model::field::Field;
use common::requests::SelectionRequest;
use log::{error, info};
use thiserror::Error;

const API_PATH: &str = "/api/exports";

const EXPORT_DATE_HEADER: &str = "Export Date";

/// Rough size of one exported customer, used for the summary.
const BYTES_PER_CUSTOMER: usize = 200;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] StoreFailure),
}

/// Registered routes:
///
/// *   **`POST /summary`**: `ExportSummary` for the posted selection.
/// *   **`POST /{format}`**: the selection as a `csv`, `xlsx` or `txt`
///     attachment. Answers `400 Bad Request` for an unknown format or an
///     empty selection.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/summary", post().to(summary))
        .route("/{format}", post().to(process))
}

pub async fn process(format: web::Path<String>, request: web::Json<SelectionRequest>) -> HttpResponse {
    let format: ExportFormat = match format.parse() {
        Ok(format) => format,
        Err(e) => return HttpResponse::BadRequest().body(e),
    };
    let SelectionRequest { customers, query } = request.into_inner();
    if customers.is_empty() {
        return HttpResponse::BadRequest().body("No customers to export");
    }

    let now = Local::now();
    match render(format, &customers, now) {
        Ok(bytes) => {
            let file_name = export_filename(format, &query, now);
            info!("Exported {} customers to {}", customers.len(), file_name);
            HttpResponse::Ok()
                .content_type(format.mime_type())
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ))
                .body(bytes)
        }
        Err(e) => {
            error!("Error exporting customers to {}: {}", format, e);
            HttpResponse::ServiceUnavailable().body(format!("Export failed: {}", e))
        }
    }
}

pub async fn summary(request: web::Json<SelectionRequest>) -> HttpResponse {
    HttpResponse::Ok().json(summarize(&request.customers, Local::now()))
}

/// Export labels in column order, followed by `Export Date`.
pub fn export_headers() -> Vec<&'static str> {
    Field::ALL
        .iter()
        .map(|f| f.export_label())
        .chain(std::iter::once(EXPORT_DATE_HEADER))
        .collect()
}

pub fn export_date(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Serializes `customers` in `format`. An empty selection yields an empty file.
pub fn render(
    format: ExportFormat,
    customers: &[Customer],
    now: DateTime<Local>,
) -> Result<Vec<u8>, ExportError> {
    if customers.is_empty() {
        return Ok(Vec::new());
    }
    let date = export_date(now);
    match format {
        ExportFormat::Csv => self::csv::write(customers, &date),
        ExportFormat::Xlsx => xlsx::write(customers, &date),
        ExportFormat::Txt => Ok(txt::write(customers, &date)),
    }
}

/// `customers[_<query>]_<YYYYmmdd_HHMMSS>.<ext>`
pub fn export_filename(format: ExportFormat, query: &str, now: DateTime<Local>) -> String {
    format!(
        "customers{}_{}.{}",
        query_suffix(query),
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

pub fn summarize(customers: &[Customer], now: DateTime<Local>) -> ExportSummary {
    ExportSummary {
        total_customers: customers.len(),
        export_date: export_date(now),
        file_size_estimate: customers.len() * BYTES_PER_CUSTOMER,
        fields_count: export_headers().len(),
        has_apartment_data: customers.iter().any(|c| !c.apartment_no.is_empty()),
        has_delivery_time: customers
            .iter()
            .any(|c| !c.scheduled_delivery_time.is_empty()),
    }
}

/// Customers in a sheet laid out like an export.
pub(crate) fn parse_export(sheet: &Sheet) -> Vec<Customer> {
    HeaderLayout::discover(sheet, Labels::Export)
        .map(|layout| parse_customers(sheet, &layout))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    fn customers() -> Vec<Customer> {
        vec![
            Customer::new("0400 111", "Ann Smith", "9am", "4", "12 High St", "Fitzroy", "3065")
                .unwrap(),
            Customer::new("0400 222", "Bob, Jr.", "", "", "5 \"Low\" Rd", "", "").unwrap(),
        ]
    }

    #[test]
    fn csv_round_trips_customers() {
        let bytes = render(ExportFormat::Csv, &customers(), fixed_now()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Phone,Customer Name,Scheduled Delivery Time,Apartment No,Address,Suburb,Postal Code,Export Date"
        );
        assert!(lines.next().unwrap().ends_with(",2024-03-05 14:07:09"));

        assert_eq!(super::csv::read_customers(&bytes).unwrap(), customers());
    }

    #[test]
    fn xlsx_round_trips_customers() {
        let bytes = render(ExportFormat::Xlsx, &customers(), fixed_now()).unwrap();
        let sheet = Sheet::from_bytes(&bytes).unwrap();
        assert_eq!(sheet.name, "Customers");
        assert_eq!(sheet.text(0, 7).as_deref(), Some("Export Date"));
        assert_eq!(sheet.text(2, 7).as_deref(), Some("2024-03-05 14:07:09"));

        assert_eq!(xlsx::read_customers(&bytes).unwrap(), customers());
    }

    #[test]
    fn txt_lists_optional_lines_only_when_present() {
        let bytes = render(ExportFormat::Txt, &customers(), fixed_now()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("DELIVERY MANAGER - CUSTOMER EXPORT\n"));
        assert!(text.contains("Export Date: 2024-03-05 14:07:09\n"));
        assert!(text.contains("Total Customers: 2\n"));

        let (first, second) = text.split_once("CUSTOMER 2\n").unwrap();
        assert!(first.contains("CUSTOMER 1\n--------------------\nName: Ann Smith\n"));
        assert!(first.contains("Apartment: 4\n"));
        assert!(first.contains("Scheduled Delivery: 9am\n"));
        assert!(!second.contains("Apartment:"));
        assert!(!second.contains("Scheduled Delivery:"));
        assert!(second.contains("Postal Code: \n"));
    }

    #[test]
    fn empty_selection_renders_nothing() {
        for format in [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Txt] {
            assert!(render(format, &[], fixed_now()).unwrap().is_empty());
        }
    }

    #[test]
    fn readers_ignore_foreign_files() {
        assert!(super::csv::read_customers(b"a,b\n1,2\n").unwrap().is_empty());
        assert!(xlsx::read_customers(b"not a workbook").is_err());
    }

    #[test]
    fn filenames_carry_query_and_timestamp() {
        assert_eq!(
            export_filename(ExportFormat::Csv, "", fixed_now()),
            "customers_20240305_140709.csv"
        );
        assert_eq!(
            export_filename(ExportFormat::Xlsx, "high st", fixed_now()),
            "customers_high_st_20240305_140709.xlsx"
        );
    }

    #[test]
    fn summary_describes_selection() {
        let summary = summarize(&customers(), fixed_now());
        assert_eq!(summary.total_customers, 2);
        assert_eq!(summary.file_size_estimate, 400);
        assert_eq!(summary.fields_count, 8);
        assert!(summary.has_apartment_data);
        assert!(summary.has_delivery_time);

        let summary = summarize(&customers()[1..], fixed_now());
        assert!(!summary.has_apartment_data);
        assert!(!summary.has_delivery_time);
    }

    #[actix_web::test]
    async fn download_is_an_attachment() {
        let app = actix_test::init_service(App::new().service(configure_routes())).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/exports/csv")
            .set_json(json!({ "customers": customers(), "query": "ann" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv"
        );
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"customers_ann_"));

        let req = actix_test::TestRequest::post()
            .uri("/api/exports/pdf")
            .set_json(json!({ "customers": customers() }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::post()
            .uri("/api/exports/txt")
            .set_json(json!({ "customers": [] }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::post()
            .uri("/api/exports/summary")
            .set_json(json!({ "customers": customers() }))
            .to_request();
        let summary: ExportSummary = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary.total_customers, 2);
    }
}
