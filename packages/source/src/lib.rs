#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Remote statistics loading, category mapping, and dataset caching.
//!
//! Each year of police statistics lives in its own CKAN datastore
//! resource. A [`RecordFetcher`] knows how to pull the raw records for one
//! year; [`loader::load_dataset`] runs it for every configured year,
//! categorizes the results, and [`loader::DatasetCache`] memoizes the
//! combined [`Dataset`](crime_dashboard_source_models::Dataset).

pub mod ckan;
pub mod loader;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod source_def;
pub mod type_mapping;

use async_trait::async_trait;
use crime_dashboard_source_models::RawRecord;

/// Errors that can occur while fetching remote statistics.
#[derive(Debug, thiserror::Error)]
pub enum RemoteFetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint answered with a non-success status.
    #[error("Request for {year} failed with status {status}")]
    Status {
        /// Year whose endpoint failed.
        year: i32,
        /// HTTP status code.
        status: u16,
    },

    /// The response parsed but did not carry a usable result.
    #[error("Malformed response for {year}: {message}")]
    Envelope {
        /// Year whose endpoint failed.
        year: i32,
        /// Description of what went wrong.
        message: String,
    },

    /// No endpoint is configured for the requested year.
    #[error("No dataset configured for year {year}")]
    UnknownYear {
        /// The requested year.
        year: i32,
    },
}

/// Data access object for per-year raw records.
///
/// The production implementation talks to CKAN
/// ([`ckan::CkanFetcher`]); tests substitute fixed fixtures.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Returns the years this fetcher can serve, ascending.
    fn years(&self) -> Vec<i32>;

    /// Fetches every raw record published for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteFetchError`] if the request fails or the response
    /// is malformed.
    async fn fetch(&self, year: i32) -> Result<Vec<RawRecord>, RemoteFetchError>;
}
