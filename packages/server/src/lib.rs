#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime dashboard.
//!
//! Serves the overview, before/after comparison, and heatmap views as
//! JSON. The multi-year police dataset is fetched from the open-data
//! portal on first use and memoized for the life of the process; the
//! boundary layer and heatmap CSV are read lazily the same way.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_dashboard_geography::boundaries::{self, DEFAULT_LAYER, LayerConfig, RegionBoundary};
use crime_dashboard_geography::{BoundaryLoadError, HeatmapDataError, heatmap};
use crime_dashboard_geography_models::HeatmapIncident;
use crime_dashboard_source::RecordFetcher;
use crime_dashboard_source::ckan::CkanFetcher;
use crime_dashboard_source::loader::DatasetCache;
use tokio::sync::OnceCell;

/// Default boundary archive location.
pub const DEFAULT_BOUNDARIES_PATH: &str = "data/police_boundaries.zip";

/// Default heatmap incident CSV location.
pub const DEFAULT_INCIDENTS_PATH: &str = "data/clean_df_heatmap.csv";

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Boundary zip archive (`CRIME_DASHBOARD_BOUNDARIES`).
    pub boundaries_path: PathBuf,
    /// Layer inside the archive (`CRIME_DASHBOARD_BOUNDARY_LAYER`).
    pub boundary_layer: String,
    /// Pre-cleaned heatmap CSV (`CRIME_DASHBOARD_INCIDENTS_CSV`).
    pub incidents_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            boundaries_path: PathBuf::from(DEFAULT_BOUNDARIES_PATH),
            boundary_layer: DEFAULT_LAYER.to_string(),
            incidents_path: PathBuf::from(DEFAULT_INCIDENTS_PATH),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from environment variables, falling back
    /// to the defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            boundaries_path: var("CRIME_DASHBOARD_BOUNDARIES")
                .map_or(defaults.boundaries_path, PathBuf::from),
            boundary_layer: var("CRIME_DASHBOARD_BOUNDARY_LAYER")
                .unwrap_or(defaults.boundary_layer),
            incidents_path: var("CRIME_DASHBOARD_INCIDENTS_CSV")
                .map_or(defaults.incidents_path, PathBuf::from),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Memoized multi-year police dataset.
    pub dataset: DatasetCache,
    boundaries_path: PathBuf,
    boundary_layer: String,
    incidents_path: PathBuf,
    boundaries: OnceCell<Arc<Vec<RegionBoundary>>>,
    incidents: OnceCell<Arc<Vec<HeatmapIncident>>>,
}

impl AppState {
    /// Creates state that fetches records through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn RecordFetcher>, config: &ServerConfig) -> Self {
        Self {
            dataset: DatasetCache::new(fetcher),
            boundaries_path: config.boundaries_path.clone(),
            boundary_layer: config.boundary_layer.clone(),
            incidents_path: config.incidents_path.clone(),
            boundaries: OnceCell::new(),
            incidents: OnceCell::new(),
        }
    }

    /// Returns the boundary layer, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryLoadError`] if the archive or layer cannot be
    /// read; the next call retries.
    pub async fn boundaries(&self) -> Result<Arc<Vec<RegionBoundary>>, BoundaryLoadError> {
        self.boundaries
            .get_or_try_init(|| async {
                let config = LayerConfig {
                    layer: &self.boundary_layer,
                    ..LayerConfig::default()
                };
                let regions = boundaries::load_layer(&self.boundaries_path, &config)?;
                Ok::<_, BoundaryLoadError>(Arc::new(regions))
            })
            .await
            .cloned()
    }

    /// Returns the heatmap incidents, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns [`HeatmapDataError`] if the CSV cannot be read; the next
    /// call retries.
    pub async fn incidents(&self) -> Result<Arc<Vec<HeatmapIncident>>, HeatmapDataError> {
        self.incidents
            .get_or_try_init(|| async {
                let incidents = heatmap::load_incidents(&self.incidents_path)?;
                Ok::<_, HeatmapDataError>(Arc::new(incidents))
            })
            .await
            .cloned()
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/categories", web::get().to(handlers::categories))
            .route("/overview/years", web::get().to(handlers::overview_years))
            .route("/overview", web::get().to(handlers::overview))
            .route("/october7/districts", web::get().to(handlers::october7_districts))
            .route("/october7", web::get().to(handlers::october7))
            .route("/heatmap/crime-types", web::get().to(handlers::heatmap_crime_types))
            .route("/heatmap", web::get().to(handlers::heatmap)),
    );
}

/// Starts the crime dashboard API server.
///
/// Builds the CKAN fetcher
/// from the embedded year registry, and starts the Actix-Web HTTP server.
/// This is a regular async function; the caller provides the async
/// runtime (e.g. via `#[actix_web::main]`) and installs the logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!(
        "Boundaries: {} (layer {}), incidents: {}",
        config.boundaries_path.display(),
        config.boundary_layer,
        config.incidents_path.display()
    );

    let fetcher: Arc<dyn RecordFetcher> = Arc::new(CkanFetcher::from_registry());
    let state = web::Data::new(AppState::new(fetcher, &config));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
