#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the Canadian immigration map dashboard.
//!
//! Loads the ADA boundary file and the statistics CSV once at startup,
//! joins them, and serves the REST API the choropleth frontend drives:
//! dropdown changes hit `/api/map` (which replaces the cached filtered
//! set), clicks hit `/api/region/{id}` (which reads it). Static
//! frontend files are served from `STATIC_DIR`.

mod handlers;

use std::path::Path;
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use immigration_map_analytics::FilteredSet;
use immigration_map_dataset::Dataset;

/// Shared application state.
pub struct AppState {
    /// The immutable joined dataset, loaded once at startup.
    pub dataset: Arc<Dataset>,
    /// The render `FeatureCollection`, serialized once at startup.
    pub geometry_json: web::Bytes,
    /// The rows that passed the most recent map filter. Replaced
    /// wholesale on every `/api/map` call, read-only on clicks; never
    /// mutated in place.
    pub cache: RwLock<Option<Arc<FilteredSet>>>,
}

impl AppState {
    /// Builds the shared state from a loaded dataset.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if the render geometry cannot be
    /// serialized.
    pub fn new(dataset: Dataset) -> Result<Self, serde_json::Error> {
        let geometry_json = web::Bytes::from(serde_json::to_string(&dataset.geometry)?);
        Ok(Self {
            dataset: Arc::new(dataset),
            geometry_json,
            cache: RwLock::new(None),
        })
    }
}

/// Starts the immigration map server.
///
/// Loads the dataset from `GEOMETRY_PATH` and `DATASET_PATH`, builds
/// the shared state, and binds the HTTP listener on
/// `BIND_ADDR`:`PORT`. A dataset that cannot be loaded (unreadable
/// source or zero-row join) is fatal: the process logs a diagnostic
/// and exits, since there is nothing to serve without it.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to
/// bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let geometry_path =
        std::env::var("GEOMETRY_PATH").unwrap_or_else(|_| "data/simplified_ada.geojson".to_string());
    let csv_path = std::env::var("DATASET_PATH").unwrap_or_else(|_| "data/BD_dataset.csv".to_string());
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "app/dist".to_string());

    log::info!("Loading dataset...");
    let dataset = Dataset::load(Path::new(&geometry_path), Path::new(&csv_path))
        .unwrap_or_else(|e| {
            log::error!("Failed to load dataset: {e}");
            std::process::exit(1);
        });
    log::info!("Dataset ready: {} regions", dataset.records.len());

    let state = web::Data::new(AppState::new(dataset).unwrap_or_else(|e| {
        log::error!("Failed to serialize render geometry: {e}");
        std::process::exit(1);
    }));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8050);

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
                    .route("/catalog", web::get().to(handlers::catalog))
                    .route("/geometry", web::get().to(handlers::geometry))
                    .route("/map", web::get().to(handlers::map))
                    .route("/region/{id}", web::get().to(handlers::region_detail)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
