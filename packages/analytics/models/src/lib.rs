#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result row types for the dashboard transforms.
//!
//! These rows are derived per request from an immutable dataset and are
//! never persisted. Counts that can be averaged are `f64`; raw tallies
//! are `u64`.

use crime_dashboard_crime_models::{Category, Period};
use serde::{Deserialize, Serialize};

/// Which years an overview aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "year")]
pub enum YearSelection {
    /// Mean over every year present in the dataset.
    #[default]
    AllYears,
    /// A single year.
    Year(i32),
}

impl From<Option<i32>> for YearSelection {
    fn from(year: Option<i32>) -> Self {
        year.map_or(Self::AllYears, Self::Year)
    }
}

impl std::fmt::Display for YearSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllYears => write!(f, "all years (mean)"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

/// Record count for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// The category.
    pub category: Category,
    /// Number of records (a mean when aggregating over all years).
    pub count: f64,
}

/// Record count for one category within one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterCount {
    /// The category.
    pub category: Category,
    /// Quarter (1-4).
    pub quarter: u8,
    /// Number of records (a mean when aggregating over all years).
    pub count: f64,
}

/// Record tally for one (category, period, district) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictCount {
    /// The category.
    pub category: Category,
    /// Before/after bucket.
    pub period: Period,
    /// Police district, or the synthetic all-districts label.
    pub police_district: String,
    /// Number of records.
    pub count: u64,
}

/// A [`DistrictCount`] with its per-quarter normalized volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDistrictCount {
    /// The category.
    pub category: Category,
    /// Before/after bucket.
    pub period: Period,
    /// Police district, or the synthetic all-districts label.
    pub police_district: String,
    /// Number of records.
    pub count: u64,
    /// `count` divided by the number of quarters in `period`.
    pub normalized_count: f64,
}

/// Normalized before/after volumes for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    /// The category.
    pub category: Category,
    /// Normalized volume before the cutover.
    pub before: f64,
    /// Normalized volume after the cutover.
    pub after: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_selection_from_option() {
        assert_eq!(YearSelection::from(None), YearSelection::AllYears);
        assert_eq!(YearSelection::from(Some(2022)), YearSelection::Year(2022));
    }

    #[test]
    fn district_count_serializes_camel_case() {
        let row = DistrictCount {
            category: Category::Security,
            period: Period::After,
            police_district: "מחוז צפון".to_string(),
            count: 4,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["category"], "SECURITY");
        assert_eq!(json["period"], "AFTER");
        assert_eq!(json["policeDistrict"], "מחוז צפון");
        assert_eq!(json["count"], 4);
    }
}
