//! Config-driven yearly dataset definition.
//!
//! Each published year of statistics is described by a small TOML file
//! (see `packages/source/sources/`). [`YearSource`] is the deserialized
//! form; [`crate::registry`] embeds and parses all of them.

use serde::Deserialize;

/// One year of published crime statistics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearSource {
    /// Unique identifier (e.g., `"israel_police_2021"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Year stamped onto every record fetched from this source.
    pub year: i32,
    /// How to fetch the raw records.
    pub fetcher: FetcherConfig,
}

/// How to fetch raw data for a year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// CKAN Datastore API (`limit`/`offset`).
    Ckan {
        /// Base `datastore_search` URL.
        api_url: String,
        /// CKAN resource ID for the year's dataset.
        resource_id: String,
        /// Records per page.
        page_size: u64,
    },
}

/// Parses a TOML string into a [`YearSource`].
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<YearSource, toml::de::Error> {
    toml::from_str(toml_str)
}
