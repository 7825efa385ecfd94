//! Before/after bucketing around the Q4 2023 cutover.

use std::collections::BTreeMap;

use crime_dashboard_analytics_models::DistrictCount;
use crime_dashboard_crime_models::{Category, Period};
use crime_dashboard_source_models::{CrimeRecord, Dataset};

/// Assigns a record to its [`Period`].
#[must_use]
pub fn segment(record: &CrimeRecord) -> Period {
    Period::from_year_quarter(record.year, record.quarter)
}

/// Tallies records per (category, period, district).
///
/// District labels are taken as-is; filtering of blank and nationwide
/// labels happens in [`crate::district::aggregate`].
#[must_use]
pub fn count_by_district(dataset: &Dataset) -> Vec<DistrictCount> {
    let mut groups: BTreeMap<(Category, Period, &str), u64> = BTreeMap::new();
    for record in dataset.records() {
        *groups
            .entry((record.category, segment(record), record.police_district.as_str()))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((category, period, district), count)| DistrictCount {
            category,
            period,
            police_district: district.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn segments_around_cutover() {
        assert_eq!(segment(&record(Category::Fraud, 2022, Some(4), "")), Period::Before);
        assert_eq!(segment(&record(Category::Fraud, 2023, Some(3), "")), Period::Before);
        assert_eq!(segment(&record(Category::Fraud, 2023, Some(4), "")), Period::After);
        assert_eq!(segment(&record(Category::Fraud, 2024, Some(1), "")), Period::After);
    }

    #[test]
    fn counts_per_group() {
        let dataset: Dataset = vec![
            record(Category::Traffic, 2021, Some(1), "מחוז צפון"),
            record(Category::Traffic, 2023, Some(2), "מחוז צפון"),
            record(Category::Traffic, 2023, Some(4), "מחוז צפון"),
            record(Category::Traffic, 2021, Some(1), "מחוז דרום"),
        ]
        .into_iter()
        .collect();

        let rows = count_by_district(&dataset);
        assert_eq!(rows.len(), 3);

        let north_before = rows
            .iter()
            .find(|r| r.police_district == "מחוז צפון" && r.period == Period::Before)
            .unwrap();
        assert_eq!(north_before.count, 2);

        let north_after = rows
            .iter()
            .find(|r| r.police_district == "מחוז צפון" && r.period == Period::After)
            .unwrap();
        assert_eq!(north_after.count, 1);
    }
}
