#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Police region boundaries and the crime heatmap join.
//!
//! Boundaries ship as a zip archive holding one `GeoJSON` document per
//! layer. [`boundaries`] extracts a layer, reprojects it to WGS84 via
//! [`reproject`], and computes label centroids. [`heatmap`] counts
//! incidents per region and left-joins the counts onto the boundaries.

pub mod boundaries;
pub mod heatmap;
pub mod reproject;

use thiserror::Error;

/// Errors that can occur while loading boundary geometry.
#[derive(Debug, Error)]
pub enum BoundaryLoadError {
    /// The archive file does not exist.
    #[error("Boundary archive not found: {0}")]
    ArchiveNotFound(String),

    /// The archive could not be read as a zip file.
    #[error("Zip error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while reading the archive.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested layer is not in the archive.
    #[error("Layer '{layer}' not found (available: {})", available.join(", "))]
    LayerNotFound {
        /// Requested layer name.
        layer: String,
        /// Layer names found in the archive.
        available: Vec<String>,
    },

    /// The layer is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The layer parsed but is not a `FeatureCollection`.
    #[error("Layer '{layer}' is not a FeatureCollection")]
    NotFeatureCollection {
        /// Layer name.
        layer: String,
    },

    /// The layer declares a coordinate reference system we cannot convert.
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    /// A projection definition was rejected.
    #[error("Projection error: {0}")]
    Projection(#[from] proj4rs::errors::Error),

    /// A coordinate could not be reprojected to WGS84.
    #[error("Failed to reproject region '{region}' to WGS84")]
    Reprojection {
        /// Name of the region whose geometry failed.
        region: String,
    },
}

/// Errors that can occur while reading the heatmap incident CSV.
#[derive(Debug, Error)]
pub enum HeatmapDataError {
    /// The CSV file does not exist.
    #[error("Incident CSV not found: {0}")]
    NotFound(String),

    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
