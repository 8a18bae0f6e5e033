#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the accident map application.
//!
//! Every map request loads the accident CSV from disk, applies the
//! submitted filters and renders a Leaflet page with clustered markers.
//! The chart page renders year-over-year changes of the reference road
//! layout table, which is parsed once at startup and shared read-only.

pub mod config;
mod handlers;
pub mod interactive;
pub mod render;
pub mod view;

use std::path::PathBuf;
use std::sync::Arc;

use accident_map_analytics::{AnalyticsError, reference};
use accident_map_analytics_models::YearlyCategoryTable;
use accident_map_dataset::{FilterError, LoadError};
use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::StatusCode;
use actix_web::{App, HttpServer, middleware, web};

pub use config::{MapDefaults, ServerConfig};

/// Shared application state.
pub struct AppState {
    /// Accident CSV, loaded fresh on every map request.
    pub dataset_path: PathBuf,
    /// Reference road layout counts behind the chart page.
    pub reference: Arc<YearlyCategoryTable>,
    /// Map center and zoom defaults.
    pub map: MapDefaults,
    /// Directory holding the landing page and stylesheet.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Builds the state for `config`, loading the reference table.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the reference table cannot be read or
    /// parsed.
    pub fn from_config(config: &ServerConfig) -> Result<Self, AnalyticsError> {
        let table = match &config.reference_table {
            Some(path) => reference::load_table(path)?,
            None => reference::reference_table()?,
        };

        Ok(Self {
            dataset_path: config.dataset_path.clone(),
            reference: Arc::new(table),
            map: config.map,
            static_dir: config.static_dir.clone(),
        })
    }
}

/// Errors surfaced by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The accident dataset could not be loaded.
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(#[from] LoadError),

    /// The submitted filter is malformed.
    #[error(transparent)]
    InvalidFilterInput(#[from] FilterError),

    /// The blocking load task was cancelled.
    #[error("Dataset load task was cancelled")]
    Cancelled,

    /// Page data could not be serialized.
    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl ServerError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFilterInput(_) => StatusCode::BAD_REQUEST,
            Self::DataUnavailable(_) | Self::Cancelled | Self::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidFilterInput(e) => e.to_string(),
            Self::DataUnavailable(_) | Self::Cancelled => {
                "Accident data is currently unavailable".to_string()
            }
            Self::Render(_) => "Failed to render page".to_string(),
        }
    }
}

/// Registers every application route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/filter", web::post().to(handlers::filter))
        .route("/grafico", web::get().to(handlers::grafico))
        .route("/home", web::get().to(handlers::home))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/points", web::get().to(handlers::points))
                .route("/percent-change", web::get().to(handlers::percent_change)),
        );
}

/// Starts the accident map server.
///
/// Loads the reference table, then starts the Actix-Web HTTP server. This
/// is a regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the reference table cannot be
/// loaded, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Loading reference table...");
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    if !config.dataset_path.is_file() {
        log::warn!(
            "Accident dataset {} does not exist; map pages will fail until it does",
            config.dataset_path.display()
        );
    }

    log::info!("Serving accidents from {}", config.dataset_path.display());

    let state = web::Data::new(state);
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/static", static_dir.clone()))
    })
    .bind((config.bind_addr.clone(), config.port))?
    .run()
    .await
}
