//! Multi-year dataset loading and process-lifetime memoization.
//!
//! [`load_dataset`] fetches every requested year in order, stamps the year
//! onto each record, maps its statistic group to a category, and discards
//! records that map to none. Any failed year fails the whole load.
//!
//! [`DatasetCache`] holds a single lazily-filled slot: the first successful
//! load is kept and every later call returns it without touching the
//! network. Failed loads leave the slot empty.

use std::sync::Arc;

use crime_dashboard_source_models::{CrimeRecord, Dataset, RawRecord};
use tokio::sync::OnceCell;

use crate::parsing::{clean_text, parse_quarter};
use crate::progress::{ProgressCallback, null_progress};
use crate::type_mapping::categorize;
use crate::{RecordFetcher, RemoteFetchError};

/// Converts one year's raw records into categorized crime records.
///
/// Records whose statistic group is missing or unmapped are dropped.
#[must_use]
pub fn categorize_records(year: i32, raw: Vec<RawRecord>) -> Vec<CrimeRecord> {
    raw.into_iter()
        .filter_map(|record| {
            let statistic_group = record.statistic_group?;
            let category = categorize(&statistic_group)?;
            Some(CrimeRecord {
                statistic_group,
                category,
                year,
                quarter: record.quarter.as_deref().and_then(parse_quarter),
                police_district: clean_text(record.police_district.as_deref()),
                police_merhav: clean_text(record.police_merhav.as_deref()),
            })
        })
        .collect()
}

/// Fetches and categorizes every year in `years`, sequentially.
///
/// # Errors
///
/// Returns the first [`RemoteFetchError`] encountered; no partial dataset
/// is produced.
pub async fn load_dataset(
    fetcher: &dyn RecordFetcher,
    years: &[i32],
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, RemoteFetchError> {
    progress.set_total(years.len() as u64);

    let mut records = Vec::new();
    for &year in years {
        progress.set_message(format!("Fetching {year}"));

        let raw = fetcher.fetch(year).await?;
        let fetched = raw.len();
        let categorized = categorize_records(year, raw);
        log::info!(
            "{year}: kept {} of {fetched} records ({} uncategorized)",
            categorized.len(),
            fetched - categorized.len()
        );

        records.extend(categorized);
        progress.inc(1);
    }

    progress.finish(format!("Loaded {} records", records.len()));

    Ok(Dataset::new(records))
}

/// Memoized access to the full multi-year dataset.
pub struct DatasetCache {
    fetcher: Arc<dyn RecordFetcher>,
    years: Vec<i32>,
    slot: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    /// Creates a cache over every year the fetcher serves.
    #[must_use]
    pub fn new(fetcher: Arc<dyn RecordFetcher>) -> Self {
        let years = fetcher.years();
        Self::with_years(fetcher, years)
    }

    /// Creates a cache over an explicit list of years.
    #[must_use]
    pub fn with_years(fetcher: Arc<dyn RecordFetcher>, years: Vec<i32>) -> Self {
        Self {
            fetcher,
            years,
            slot: OnceCell::new(),
        }
    }

    /// Whether a dataset has already been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.slot.initialized()
    }

    /// Returns the dataset, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteFetchError`] if the load fails.
    pub async fn get(&self) -> Result<Arc<Dataset>, RemoteFetchError> {
        self.get_with_progress(&null_progress()).await
    }

    /// Like [`Self::get`], reporting per-year progress if a load happens.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteFetchError`] if the load fails.
    pub async fn get_with_progress(
        &self,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Arc<Dataset>, RemoteFetchError> {
        self.slot
            .get_or_try_init(|| async {
                let dataset = load_dataset(self.fetcher.as_ref(), &self.years, progress).await?;
                Ok::<_, RemoteFetchError>(Arc::new(dataset))
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use crime_dashboard_crime_models::Category;

    use super::*;

    fn raw(group: &str, quarter: &str) -> RawRecord {
        RawRecord {
            statistic_group: Some(group.to_string()),
            quarter: Some(quarter.to_string()),
            police_district: Some(" מחוז דרום ".to_string()),
            police_merhav: Some("מרחב נגב".to_string()),
        }
    }

    struct FixtureFetcher {
        years: BTreeMap<i32, Vec<RawRecord>>,
        calls: AtomicUsize,
        fail_first: AtomicUsize,
    }

    impl FixtureFetcher {
        fn new(years: &[i32]) -> Self {
            let years = years
                .iter()
                .map(|&y| (y, vec![raw("עבירות תנועה", "Q2"), raw("עבירות לא ממופות", "Q2")]))
                .collect();
            Self {
                years,
                calls: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecordFetcher for FixtureFetcher {
        fn years(&self) -> Vec<i32> {
            self.years.keys().copied().collect()
        }

        async fn fetch(&self, year: i32) -> Result<Vec<RawRecord>, RemoteFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.load(Ordering::SeqCst) > 0 {
                self.fail_first.fetch_sub(1, Ordering::SeqCst);
                return Err(RemoteFetchError::Status { year, status: 503 });
            }
            self.years
                .get(&year)
                .cloned()
                .ok_or(RemoteFetchError::UnknownYear { year })
        }
    }

    #[test]
    fn categorize_records_drops_unmapped_and_missing_groups() {
        let mut records = vec![raw("עבירות מין", "רבעון 3"), raw("אחר", "Q1")];
        records.push(RawRecord::default());

        let out = categorize_records(2022, records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, Category::GeneralCriminal);
        assert_eq!(out[0].year, 2022);
        assert_eq!(out[0].quarter, Some(3));
        assert_eq!(out[0].police_district, "מחוז דרום");
    }

    #[tokio::test]
    async fn load_keeps_one_categorized_record_per_year() {
        let fetcher = FixtureFetcher::new(&[2020, 2021, 2022]);
        let dataset = load_dataset(&fetcher, &fetcher.years(), &null_progress())
            .await
            .unwrap();

        assert_eq!(dataset.len(), 3);
        assert!(
            dataset
                .records()
                .iter()
                .all(|r| r.category == Category::Traffic && r.category.label() == "עבירות תנועה")
        );
        let years: Vec<i32> = dataset.records().iter().map(|r| r.year).collect();
        assert_eq!(years, [2020, 2021, 2022]);
    }

    #[tokio::test]
    async fn load_fails_when_any_year_fails() {
        let fetcher = FixtureFetcher::new(&[2020, 2021]);
        let err = load_dataset(&fetcher, &[2020, 2021, 2023], &null_progress())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteFetchError::UnknownYear { year: 2023 }));
    }

    #[tokio::test]
    async fn cache_fetches_once() {
        let fetcher = Arc::new(FixtureFetcher::new(&[2020, 2021, 2022]));
        let cache = DatasetCache::new(fetcher.clone());
        assert!(!cache.is_loaded());

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert!(cache.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cache_retries_after_failed_load() {
        let fetcher = Arc::new(FixtureFetcher::new(&[2020, 2021]));
        fetcher.fail_first.store(1, Ordering::SeqCst);
        let cache = DatasetCache::new(fetcher.clone());

        assert!(cache.get().await.is_err());
        assert!(!cache.is_loaded());

        let dataset = cache.get().await.unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }
}
