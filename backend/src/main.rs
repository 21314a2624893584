mod config;
mod ledger;
mod services;

use crate::config::Config;
use crate::ledger::facade::Ledger;
use crate::ledger::store::SpreadsheetStore;
use crate::ledger::LedgerState;
use crate::services::print::PrintSettings;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{info, warn};
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();
    info!("Using ledger file {}", config.ledger_file.display());

    let mut store = SpreadsheetStore::new(&config.ledger_file);
    if let Some(dir) = &config.backup_dir {
        store = store.with_backup_dir(dir);
    }
    if store.ensure_initialized().is_err() {
        warn!("Ledger file could not be prepared; requests will fail until it is fixed");
    }

    let ledger_state = LedgerState::new(Ledger::new(store));
    let print_settings = PrintSettings {
        fonts_dir: config.fonts_dir.clone(),
    };

    let url = config.server_url();
    if config.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(ledger_state.clone()))
            .app_data(web::Data::new(print_settings.clone()))
            .service(services::customers::configure_routes())
            .service(services::maintenance::configure_routes())
            .service(services::exports::configure_routes())
            .service(services::print::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
