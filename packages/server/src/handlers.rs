//! HTTP handler functions for the crime dashboard API.

use actix_web::{HttpResponse, web};
use crime_dashboard_analytics::{comparison, overview};
use crime_dashboard_analytics_models::YearSelection;
use crime_dashboard_crime_models::{ALL_DISTRICTS, Category};
use crime_dashboard_geography::heatmap;
use crime_dashboard_geography_models::{ALL_CRIMES, HeatmapFilter};
use crime_dashboard_server_models::{
    ApiCategory, ApiComparison, ApiHealth, ApiOverview, ComparisonQueryParams, HeatmapQueryParams,
    OverviewQueryParams,
};
use crime_dashboard_source::RemoteFetchError;

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_loaded: state.dataset.is_loaded(),
    })
}

/// `GET /api/categories`
///
/// Returns the six chart categories with their feed labels.
pub async fn categories() -> HttpResponse {
    let categories: Vec<ApiCategory> = Category::all()
        .iter()
        .copied()
        .map(ApiCategory::from)
        .collect();
    HttpResponse::Ok().json(categories)
}

/// `GET /api/overview/years`
pub async fn overview_years(state: web::Data<AppState>) -> HttpResponse {
    match state.dataset.get().await {
        Ok(dataset) => HttpResponse::Ok().json(overview::available_years(&dataset)),
        Err(e) => fetch_failed(&e),
    }
}

/// `GET /api/overview`
///
/// Category counts for one year, or the per-year mean when no year is
/// given, optionally split by quarter.
pub async fn overview(
    state: web::Data<AppState>,
    params: web::Query<OverviewQueryParams>,
) -> HttpResponse {
    let dataset = match state.dataset.get().await {
        Ok(dataset) => dataset,
        Err(e) => return fetch_failed(&e),
    };

    let selection = YearSelection::from(params.year);
    let quarters = params
        .split_by_quarter
        .unwrap_or(false)
        .then(|| overview::quarter_counts(&dataset, selection));

    HttpResponse::Ok().json(ApiOverview {
        selection,
        categories: overview::category_counts(&dataset, selection),
        quarters,
    })
}

/// `GET /api/october7/districts`
pub async fn october7_districts(state: web::Data<AppState>) -> HttpResponse {
    match state.dataset.get().await {
        Ok(dataset) => {
            let rows = comparison::october_seventh_rows(&dataset);
            HttpResponse::Ok().json(comparison::districts(&rows))
        }
        Err(e) => fetch_failed(&e),
    }
}

/// `GET /api/october7`
///
/// Normalized before/after volumes per category for one district.
pub async fn october7(
    state: web::Data<AppState>,
    params: web::Query<ComparisonQueryParams>,
) -> HttpResponse {
    let dataset = match state.dataset.get().await {
        Ok(dataset) => dataset,
        Err(e) => return fetch_failed(&e),
    };

    let district = params
        .district
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(ALL_DISTRICTS)
        .to_string();
    let rows = comparison::october_seventh_rows(&dataset);
    let categories = comparison::compare(&rows, &district);

    HttpResponse::Ok().json(ApiComparison {
        district,
        categories,
    })
}

/// `GET /api/heatmap/crime-types`
///
/// `all_crimes` followed by every statistic group in the incident CSV.
pub async fn heatmap_crime_types(state: web::Data<AppState>) -> HttpResponse {
    match state.incidents().await {
        Ok(incidents) => {
            let mut types = vec![ALL_CRIMES.to_string()];
            types.extend(heatmap::crime_types(&incidents));
            HttpResponse::Ok().json(types)
        }
        Err(e) => {
            log::error!("Failed to load heatmap incidents: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load heatmap incidents"
            }))
        }
    }
}

/// `GET /api/heatmap`
///
/// Returns the boundary layer as a `GeoJSON` feature collection with
/// per-region incident counts.
pub async fn heatmap(
    state: web::Data<AppState>,
    params: web::Query<HeatmapQueryParams>,
) -> HttpResponse {
    let incidents = match state.incidents().await {
        Ok(incidents) => incidents,
        Err(e) => {
            log::error!("Failed to load heatmap incidents: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load heatmap incidents"
            }));
        }
    };
    let boundaries = match state.boundaries().await {
        Ok(boundaries) => boundaries,
        Err(e) => {
            log::error!("Failed to load boundaries: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load region boundaries"
            }));
        }
    };

    let filter = HeatmapFilter::from_selection(params.crime_type.as_deref(), params.year);
    let counts = heatmap::counts_by_region(&incidents, &filter);
    let joined = heatmap::join(&boundaries, &counts);
    log::debug!(
        "Heatmap {filter:?}: {} regions, {} unmatched",
        joined.regions.len(),
        joined.unmatched.len()
    );

    HttpResponse::Ok().json(joined.to_feature_collection())
}

fn fetch_failed(e: &RemoteFetchError) -> HttpResponse {
    log::error!("Failed to load crime data: {e}");
    HttpResponse::BadGateway().json(serde_json::json!({
        "error": "Failed to load crime data from the open-data portal"
    }))
}
