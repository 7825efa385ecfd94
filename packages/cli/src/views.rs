//! Terminal renderings of the dashboard views.

use std::path::PathBuf;
use std::sync::Arc;

use crime_dashboard_analytics::{comparison, overview};
use crime_dashboard_analytics_models::YearSelection;
use crime_dashboard_cli_utils::{IndicatifProgress, MultiProgress};
use crime_dashboard_crime_models::ALL_DISTRICTS;
use crime_dashboard_geography::boundaries::{self, LayerConfig, RegionBoundary};
use crime_dashboard_geography::heatmap;
use crime_dashboard_geography_models::{HeatmapFilter, HeatmapIncident};
use crime_dashboard_source::RemoteFetchError;
use crime_dashboard_source::loader::DatasetCache;
use crime_dashboard_source::progress::ProgressCallback;
use crime_dashboard_source::registry::all_sources;
use crime_dashboard_source::source_def::FetcherConfig;
use crime_dashboard_source_models::Dataset;

/// Everything the heatmap view needs.
#[derive(Debug, Clone)]
pub struct HeatmapArgs {
    /// Boundary zip archive.
    pub boundaries: PathBuf,
    /// Pre-cleaned incident CSV.
    pub incidents: PathBuf,
    /// Layer inside the archive.
    pub layer: String,
    /// Feature property naming each region.
    pub name_field: String,
    /// Statistic group to count (`None` or `all_crimes` = every group).
    pub crime_type: Option<String>,
    /// Year to count (`None` = every year).
    pub year: Option<i32>,
    /// Where to write the joined `GeoJSON`, if anywhere.
    pub output: Option<PathBuf>,
}

/// Prints the configured yearly datasets.
pub fn print_sources() {
    println!("{:<24} {:<6} RESOURCE", "ID", "YEAR");
    println!("{}", "-".repeat(72));
    for source in all_sources() {
        let FetcherConfig::Ckan { resource_id, .. } = &source.fetcher;
        println!("{:<24} {:<6} {resource_id}", source.id, source.year);
    }
}

/// Loads (or reuses) the dataset with a per-year progress bar.
pub async fn load(
    cache: &DatasetCache,
    multi: &MultiProgress,
) -> Result<Arc<Dataset>, RemoteFetchError> {
    if cache.is_loaded() {
        return cache.get().await;
    }
    let progress = IndicatifProgress::steps_bar(multi, "Fetching police statistics");
    finish_on_error(progress.as_ref(), cache.get_with_progress(&progress).await)
}

/// Prints category counts, optionally split by quarter.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub async fn overview(
    cache: &DatasetCache,
    multi: &MultiProgress,
    selection: YearSelection,
    split_by_quarter: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(cache, multi).await?;

    println!();
    println!("Records by category ({selection})");
    println!("{}", "-".repeat(48));
    for row in overview::category_counts(&dataset, selection) {
        println!("{:<32} {:>12.1}", row.category.label(), row.count);
    }

    if split_by_quarter {
        println!();
        println!("{:<32} {:>3} {:>12}", "CATEGORY", "Q", "RECORDS");
        println!("{}", "-".repeat(48));
        for row in overview::quarter_counts(&dataset, selection) {
            println!(
                "{:<32} {:>3} {:>12.1}",
                row.category.label(),
                row.quarter,
                row.count
            );
        }
    }

    Ok(())
}

/// Prints the before/after comparison for one district, or the district
/// list when `list_districts` is set.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub async fn october7(
    cache: &DatasetCache,
    multi: &MultiProgress,
    district: Option<&str>,
    list_districts: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load(cache, multi).await?;
    let rows = comparison::october_seventh_rows(&dataset);

    if list_districts {
        for label in comparison::districts(&rows) {
            println!("{label}");
        }
        return Ok(());
    }

    let district = district.unwrap_or(ALL_DISTRICTS);
    let categories = comparison::compare(&rows, district);
    if categories.is_empty() {
        println!("No records for district '{district}'");
        return Ok(());
    }

    println!();
    println!("Quarterly volume before/after 7 October 2023: {district}");
    println!(
        "{:<32} {:>10} {:>10} {:>9}",
        "CATEGORY", "BEFORE", "AFTER", "CHANGE"
    );
    println!("{}", "-".repeat(64));
    for row in categories {
        println!(
            "{:<32} {:>10.1} {:>10.1} {:>9}",
            row.category.label(),
            row.before,
            row.after,
            format_change(row.before, row.after)
        );
    }

    Ok(())
}

/// Prints per-region counts and optionally writes the joined `GeoJSON`.
///
/// # Errors
///
/// Returns an error if the boundaries or incidents cannot be read, or the
/// output file cannot be written.
pub fn heatmap(
    multi: &MultiProgress,
    args: &HeatmapArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::spinner(multi, "Reading boundary layer");
    let (regions, incidents) = read_heatmap_inputs(progress.as_ref(), args)?;

    let filter = HeatmapFilter::from_selection(args.crime_type.as_deref(), args.year);
    let counts = heatmap::counts_by_region(&incidents, &filter);
    let joined = heatmap::join(&regions, &counts);

    let mut rows = joined.region_counts();
    rows.sort_by(|a, b| b.record_count.cmp(&a.record_count).then(a.name.cmp(&b.name)));

    println!();
    println!("{:<32} {:>10} {:>10} {:>10}", "REGION", "RECORDS", "LAT", "LON");
    println!("{}", "-".repeat(66));
    for row in &rows {
        let (lat, lon) = row
            .centroid
            .map_or((String::new(), String::new()), |c| {
                (format!("{:.4}", c.latitude), format!("{:.4}", c.longitude))
            });
        println!("{:<32} {:>10} {lat:>10} {lon:>10}", row.name, row.record_count);
    }

    if !joined.unmatched.is_empty() {
        println!();
        println!("No boundary for: {}", joined.unmatched.join(", "));
    }

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&joined.to_feature_collection())?;
        std::fs::write(output, json)?;
        log::info!("Wrote {}", output.display());
    }

    Ok(())
}

/// Reads the boundary layer and incident CSV, finishing `progress` either
/// way.
fn read_heatmap_inputs(
    progress: &dyn ProgressCallback,
    args: &HeatmapArgs,
) -> Result<(Vec<RegionBoundary>, Vec<HeatmapIncident>), Box<dyn std::error::Error>> {
    let config = LayerConfig {
        layer: &args.layer,
        name_field: &args.name_field,
    };
    let regions = finish_on_error(progress, boundaries::load_layer(&args.boundaries, &config))?;

    progress.set_message("Reading incidents".to_string());
    let incidents = finish_on_error(progress, heatmap::load_incidents(&args.incidents))?;
    progress.finish(format!(
        "{} regions, {} incidents",
        regions.len(),
        incidents.len()
    ));

    Ok((regions, incidents))
}

/// Stops the indicator with the error so it does not keep ticking.
fn finish_on_error<T, E: std::fmt::Display>(
    progress: &dyn ProgressCallback,
    result: Result<T, E>,
) -> Result<T, E> {
    if let Err(e) = &result {
        progress.finish(format!("Failed: {e}"));
    }
    result
}

/// Relative change from `before` to `after`, e.g. `+12.5%`.
fn format_change(before: f64, after: f64) -> String {
    if before.abs() < f64::EPSILON {
        return "n/a".to_string();
    }
    format!("{:+.1}%", (after - before) / before * 100.0)
}
