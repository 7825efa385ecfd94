//! CKAN Datastore API fetcher.
//!
//! Handles paginated fetching from `datastore_search` endpoints. The
//! datastore caps a single response, so each year is read page by page
//! with `limit`/`offset` until a short page comes back.

use std::future::Future;

use async_trait::async_trait;
use crime_dashboard_source_models::RawRecord;
use serde::Deserialize;

use crate::registry::all_sources;
use crate::source_def::{FetcherConfig, YearSource};
use crate::{RecordFetcher, RemoteFetchError};

/// The `datastore_search` response envelope.
#[derive(Debug, Deserialize)]
struct DatastoreResponse {
    #[serde(default = "default_success")]
    success: bool,
    result: Option<DatastoreResult>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DatastoreResult {
    records: Option<Vec<RawRecord>>,
    total: Option<u64>,
}

const fn default_success() -> bool {
    true
}

/// One page of a CKAN datastore response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastorePage {
    /// Records on this page.
    pub records: Vec<RawRecord>,
    /// Total number of records in the resource, when reported.
    pub total: Option<u64>,
}

/// Parses a `datastore_search` response body.
///
/// # Errors
///
/// Returns [`RemoteFetchError::Json`] if the body is not valid JSON of the
/// expected shape, or [`RemoteFetchError::Envelope`] if the API reports a
/// failure or the `result.records` array is missing.
pub fn parse_datastore_page(year: i32, body: &str) -> Result<DatastorePage, RemoteFetchError> {
    let response: DatastoreResponse = serde_json::from_str(body)?;

    if !response.success {
        let message = response
            .error
            .map_or_else(|| "success=false".to_string(), |e| e.to_string());
        return Err(RemoteFetchError::Envelope { year, message });
    }

    let result = response.result.ok_or_else(|| RemoteFetchError::Envelope {
        year,
        message: "No result object in response".to_string(),
    })?;

    let records = result.records.ok_or_else(|| RemoteFetchError::Envelope {
        year,
        message: "No result.records array in response".to_string(),
    })?;

    Ok(DatastorePage {
        records,
        total: result.total,
    })
}

/// Whether paging stops after a page of `count` records that ended at
/// `offset`: a short page, or `total` reached.
#[must_use]
pub const fn is_last_page(count: u64, page_size: u64, offset: u64, total: Option<u64>) -> bool {
    if count < page_size {
        return true;
    }
    match total {
        Some(total) => offset >= total,
        None => false,
    }
}

/// Reads pages from `fetch_page(offset)` until [`is_last_page`] says stop.
///
/// # Errors
///
/// Returns the first error any page fetch produces.
pub async fn fetch_all_pages<F, Fut>(
    page_size: u64,
    mut fetch_page: F,
) -> Result<Vec<RawRecord>, RemoteFetchError>
where
    F: FnMut(u64) -> Fut + Send,
    Fut: Future<Output = Result<DatastorePage, RemoteFetchError>> + Send,
{
    let mut all_records: Vec<RawRecord> = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let page = fetch_page(offset).await?;
        let count = page.records.len() as u64;
        all_records.extend(page.records);
        offset += count;

        if is_last_page(count, page_size, offset, page.total) {
            return Ok(all_records);
        }
    }
}

/// Fetches yearly datasets from CKAN `datastore_search` endpoints.
pub struct CkanFetcher {
    client: reqwest::Client,
    sources: Vec<YearSource>,
}

impl CkanFetcher {
    /// Creates a fetcher over the given year sources.
    #[must_use]
    pub fn new(sources: Vec<YearSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            sources,
        }
    }

    /// Creates a fetcher over every source in the embedded registry.
    #[must_use]
    pub fn from_registry() -> Self {
        Self::new(all_sources())
    }

    async fn fetch_page(
        &self,
        year: i32,
        api_url: &str,
        resource_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<DatastorePage, RemoteFetchError> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let response = self
            .client
            .get(api_url)
            .query(&[
                ("resource_id", resource_id),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status {
                year,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_datastore_page(year, &body)
    }
}

#[async_trait]
impl RecordFetcher for CkanFetcher {
    fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.sources.iter().map(|s| s.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    async fn fetch(&self, year: i32) -> Result<Vec<RawRecord>, RemoteFetchError> {
        let source = self
            .sources
            .iter()
            .find(|s| s.year == year)
            .ok_or(RemoteFetchError::UnknownYear { year })?;

        let FetcherConfig::Ckan {
            api_url,
            resource_id,
            page_size,
        } = &source.fetcher;
        let page_size = (*page_size).max(1);

        let all_records = fetch_all_pages(page_size, move |offset| {
            log::info!(
                "Fetching {} data: offset={offset}, limit={page_size}",
                source.name
            );
            self.fetch_page(year, api_url, resource_id, page_size, offset)
        })
        .await?;

        log::info!("Downloaded {} {} records total", all_records.len(), source.name);

        Ok(all_records)
    }
}
