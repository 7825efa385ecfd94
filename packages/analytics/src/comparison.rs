//! The before/after comparison view.
//!
//! Chains period segmentation, district rollup, and normalization, then
//! pivots one district's rows into per-category before/after values.

use std::collections::{BTreeMap, BTreeSet};

use crime_dashboard_analytics_models::{CategoryComparison, NormalizedDistrictCount};
use crime_dashboard_crime_models::{ALL_DISTRICTS, Category, Period};
use crime_dashboard_source_models::Dataset;

use crate::{district, normalize, period};

/// Builds the normalized (category, period, district) rows, including the
/// synthetic nationwide rows.
#[must_use]
pub fn october_seventh_rows(dataset: &Dataset) -> Vec<NormalizedDistrictCount> {
    let counts = period::count_by_district(dataset);
    let aggregated = district::aggregate(counts);
    normalize::normalize(aggregated)
}

/// Lists the selectable districts: [`ALL_DISTRICTS`] first, then the rest
/// in lexicographic order.
#[must_use]
pub fn districts(rows: &[NormalizedDistrictCount]) -> Vec<String> {
    let labels: BTreeSet<&str> = rows.iter().map(|r| r.police_district.as_str()).collect();

    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    if labels.contains(ALL_DISTRICTS) {
        out.push(ALL_DISTRICTS.to_string());
    }
    out.extend(
        labels
            .into_iter()
            .filter(|label| *label != ALL_DISTRICTS)
            .map(str::to_string),
    );
    out
}

/// Sums normalized volumes per category and period for one district.
///
/// Only categories with at least one row for the district are returned,
/// in charting order; a missing period reads as zero.
#[must_use]
pub fn compare(rows: &[NormalizedDistrictCount], district: &str) -> Vec<CategoryComparison> {
    let mut sums: BTreeMap<Category, (f64, f64)> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.police_district == district) {
        let entry = sums.entry(row.category).or_default();
        match row.period {
            Period::Before => entry.0 += row.normalized_count,
            Period::After => entry.1 += row.normalized_count,
        }
    }

    sums.into_iter()
        .map(|(category, (before, after))| CategoryComparison {
            category,
            before,
            after,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        // 15 before-records and 5 after-records in the north.
        for quarter in 1..=3 {
            for _ in 0..5 {
                records.push(record(Category::Traffic, 2022, Some(quarter), "מחוז צפון"));
            }
        }
        for _ in 0..5 {
            records.push(record(Category::Traffic, 2024, Some(2), "מחוז צפון"));
        }
        // 5 after-records in the south, another category.
        for _ in 0..5 {
            records.push(record(Category::Security, 2023, Some(4), "מחוז דרום"));
        }
        // Feed-level nationwide rows never reach the comparison.
        records.push(record(Category::Traffic, 2024, Some(1), "כל הארץ"));
        records.into_iter().collect()
    }

    #[test]
    fn district_list_puts_rollup_first() {
        let rows = october_seventh_rows(&dataset());
        assert_eq!(
            districts(&rows),
            vec![
                ALL_DISTRICTS.to_string(),
                "מחוז דרום".to_string(),
                "מחוז צפון".to_string(),
            ]
        );
    }

    #[test]
    fn compares_single_district() {
        let rows = october_seventh_rows(&dataset());
        let north = compare(&rows, "מחוז צפון");
        assert_eq!(north.len(), 1);
        assert_eq!(north[0].category, Category::Traffic);
        assert!((north[0].before - 1.0).abs() < f64::EPSILON);
        assert!((north[0].after - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_districts_reads_rollup_rows_only() {
        let rows = october_seventh_rows(&dataset());
        let all = compare(&rows, ALL_DISTRICTS);
        assert_eq!(all.len(), 2);

        let traffic = all.iter().find(|c| c.category == Category::Traffic).unwrap();
        assert!((traffic.before - 1.0).abs() < f64::EPSILON);
        assert!((traffic.after - 1.0).abs() < f64::EPSILON);

        let security = all.iter().find(|c| c.category == Category::Security).unwrap();
        assert!(security.before.abs() < f64::EPSILON);
        assert!((security.after - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_district_is_empty() {
        let rows = october_seventh_rows(&dataset());
        assert!(compare(&rows, "מחוז לא קיים").is_empty());
    }
}
