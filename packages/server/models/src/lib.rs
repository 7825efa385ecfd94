#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics row types to allow independent evolution of the API
//! contract.

use crime_dashboard_analytics_models::{
    CategoryComparison, CategoryCount, QuarterCount, YearSelection,
};
use crime_dashboard_crime_models::Category;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the remote dataset has been loaded yet.
    pub dataset_loaded: bool,
}

/// A chart category with its display label and the feed labels it groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategory {
    /// Category identifier.
    pub id: Category,
    /// Hebrew display label.
    pub label: String,
    /// Source-feed `StatisticGroup` labels in this category.
    pub statistic_groups: Vec<String>,
}

impl From<Category> for ApiCategory {
    fn from(category: Category) -> Self {
        Self {
            id: category,
            label: category.label().to_string(),
            statistic_groups: category
                .statistic_groups()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Query parameters for the overview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQueryParams {
    /// Year to show; absent means the mean over all years.
    pub year: Option<i32>,
    /// Whether to include the per-quarter breakdown.
    pub split_by_quarter: Option<bool>,
}

/// Overview response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOverview {
    /// The year selection the counts were computed for.
    pub selection: YearSelection,
    /// Per-category counts, one entry per category.
    pub categories: Vec<CategoryCount>,
    /// Per-category per-quarter counts; present only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarters: Option<Vec<QuarterCount>>,
}

/// Query parameters for the before/after comparison endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQueryParams {
    /// District label; absent means all districts.
    pub district: Option<String>,
}

/// Before/after comparison response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiComparison {
    /// The district the comparison covers.
    pub district: String,
    /// Normalized before/after volumes for the categories present.
    pub categories: Vec<CategoryComparison>,
}

/// Query parameters for the heatmap endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapQueryParams {
    /// Statistic group to count, or `all_crimes`.
    pub crime_type: Option<String>,
    /// Year to count; absent means all years.
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_category_lists_feed_labels() {
        let api = ApiCategory::from(Category::MoralityPublicOrder);
        assert_eq!(api.label, "עבירות מוסר וסדר ציבורי");
        assert_eq!(api.statistic_groups.len(), 2);

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["id"], "MORALITY_PUBLIC_ORDER");
        assert!(json["statisticGroups"].is_array());
    }

    #[test]
    fn overview_params_are_camel_case() {
        let params: OverviewQueryParams =
            serde_json::from_str(r#"{"year": 2022, "splitByQuarter": true}"#).unwrap();
        assert_eq!(params.year, Some(2022));
        assert_eq!(params.split_by_quarter, Some(true));
    }

    #[test]
    fn overview_omits_quarters_unless_requested() {
        let overview = ApiOverview {
            selection: YearSelection::AllYears,
            categories: vec![],
            quarters: None,
        };
        let json = serde_json::to_value(&overview).unwrap();
        assert!(json.get("quarters").is_none());
    }
}
