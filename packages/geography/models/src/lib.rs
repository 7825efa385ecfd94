#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Police region and heatmap incident types.
//!
//! Regions are police merhavim (sub-district regions). Heatmap incidents
//! come from a pre-cleaned CSV and are counted per region; the geometry
//! itself lives in `crime_dashboard_geography`.

use serde::{Deserialize, Serialize};

/// Crime-type selector value meaning "count every statistic group".
pub const ALL_CRIMES: &str = "all_crimes";

/// One row of the pre-cleaned heatmap incident CSV.
///
/// Unknown columns are ignored; every known column is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapIncident {
    /// Fine-grained crime-type label.
    #[serde(rename = "StatisticGroup", default)]
    pub statistic_group: Option<String>,
    /// Police merhav name, the join key against region boundaries.
    #[serde(rename = "PoliceMerhav", default)]
    pub police_merhav: Option<String>,
    /// Year as written by the export (`"2021"` or `"2021.0"`).
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    /// Quarter text.
    #[serde(rename = "Quarter", default)]
    pub quarter: Option<String>,
}

impl HeatmapIncident {
    /// Parses the year column.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn year(&self) -> Option<i32> {
        let raw = self.year.as_deref()?.trim();
        if let Ok(year) = raw.parse::<i32>() {
            return Some(year);
        }
        let value = raw.parse::<f64>().ok()?;
        (value.is_finite() && value.fract() == 0.0).then_some(value as i32)
    }
}

/// Which incidents a heatmap counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapFilter {
    /// Only count this statistic group; `None` counts all crimes.
    pub statistic_group: Option<String>,
    /// Only count this year; `None` counts all years.
    pub year: Option<i32>,
}

impl HeatmapFilter {
    /// Builds a filter from selector values; an absent or [`ALL_CRIMES`]
    /// crime type counts every group.
    #[must_use]
    pub fn from_selection(crime_type: Option<&str>, year: Option<i32>) -> Self {
        let statistic_group = crime_type
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != ALL_CRIMES)
            .map(str::to_string);
        Self {
            statistic_group,
            year,
        }
    }

    /// Whether an incident passes this filter.
    #[must_use]
    pub fn matches(&self, incident: &HeatmapIncident) -> bool {
        if let Some(group) = &self.statistic_group
            && incident.statistic_group.as_deref() != Some(group.as_str())
        {
            return false;
        }
        if let Some(year) = self.year
            && incident.year() != Some(year)
        {
            return false;
        }
        true
    }
}

/// A geographic point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Incident count for one region, with its label position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    /// Region name as found in the boundary layer.
    pub name: String,
    /// Number of matching incidents (zero when none matched).
    pub record_count: u64,
    /// Region centroid, if the geometry has one.
    pub centroid: Option<LatLng>,
}
