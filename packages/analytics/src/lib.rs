#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard transforms over an immutable crime dataset.
//!
//! Every function here is pure: it takes the loaded
//! [`Dataset`](crime_dashboard_source_models::Dataset) (or rows derived from
//! it) and returns freshly computed rows.
//!
//! - [`overview`] counts records per category, optionally per quarter.
//! - [`period`] buckets records around the Q4 2023 cutover and tallies
//!   them per district.
//! - [`district`] adds the synthetic nationwide rollup rows.
//! - [`normalize`] scales tallies by the length of their period.
//! - [`comparison`] chains the above into the before/after view.

pub mod comparison;
pub mod district;
pub mod normalize;
pub mod overview;
pub mod period;

#[cfg(test)]
pub(crate) mod test_support {
    use crime_dashboard_crime_models::Category;
    use crime_dashboard_source_models::CrimeRecord;

    pub fn record(
        category: Category,
        year: i32,
        quarter: Option<u8>,
        district: &str,
    ) -> CrimeRecord {
        CrimeRecord {
            statistic_group: category.statistic_groups()[0].to_string(),
            category,
            year,
            quarter,
            police_district: district.to_string(),
            police_merhav: String::new(),
        }
    }
}
