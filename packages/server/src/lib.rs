#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the sighting map application.
//!
//! Serves the REST API for reporting and querying sightings, plus the
//! built frontend as static files. The store, geofence configuration,
//! and admin token are constructed once at startup and handed to the
//! handlers through [`AppState`]; nothing reads ambient globals per
//! request.

mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use sighting_map_database::db::open_db;
use sighting_map_models::GeofenceConfig;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Sightings database connection.
    pub db: Arc<dyn Database>,
    /// Admission boundary for new sightings, loaded once at startup.
    pub geofence: GeofenceConfig,
    /// Shared secret for the admin delete endpoint, from `ADMIN_TOKEN`.
    /// `None` means delete is disabled.
    pub admin_token: Option<String>,
}

/// Starts the sighting map API server.
///
/// Opens the `SQLite` database (creating the schema if needed), loads the
/// geofence configuration from the environment, and starts the Actix-Web
/// HTTP server. This is a regular async function — the caller provides
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database cannot be opened.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "data/sightings.db".to_string());
    log::info!("Opening sightings database at {db_path}...");
    let db = open_db(Path::new(&db_path))
        .await
        .expect("Failed to open sightings database");

    let geofence = sighting_map_geofence::config_from_env();

    let admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
    if admin_token.is_none() {
        log::warn!("ADMIN_TOKEN is not set; the delete endpoint is disabled");
    }

    let state = web::Data::new(AppState {
        db: Arc::from(db),
        geofence,
        admin_token,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/config", web::get().to(handlers::config))
                    .route("/sightings", web::get().to(handlers::list_sightings))
                    .route("/sightings", web::post().to(handlers::create_sighting))
                    .route("/sightings/{id}", web::get().to(handlers::get_sighting))
                    .route(
                        "/sightings/{id}",
                        web::delete().to(handlers::delete_sighting),
                    ),
            )
            // Serve frontend static files (production)
            .service(actix_files::Files::new("/", "public").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
