//! Incident counting and the boundary join behind the heatmap.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use crime_dashboard_geography_models::{HeatmapFilter, HeatmapIncident, RegionCount};
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::HeatmapDataError;
use crate::boundaries::RegionBoundary;

/// Loads the pre-cleaned incident CSV at `path`.
///
/// # Errors
///
/// * [`HeatmapDataError::NotFound`] if `path` does not exist
/// * [`HeatmapDataError::Csv`] if the file or its header cannot be read
pub fn load_incidents(path: &Path) -> Result<Vec<HeatmapIncident>, HeatmapDataError> {
    if !path.exists() {
        return Err(HeatmapDataError::NotFound(path.display().to_string()));
    }
    log::info!("Loading heatmap incidents from {}", path.display());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_incidents(file)
}

/// Reads incidents from CSV text with a header row.
///
/// Rows that fail to deserialize are skipped with a warning.
///
/// # Errors
///
/// Returns [`HeatmapDataError::Csv`] if the header cannot be read.
pub fn read_incidents<R: Read>(reader: R) -> Result<Vec<HeatmapIncident>, HeatmapDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    reader.headers()?;

    let mut incidents = Vec::new();
    let mut skipped = 0_usize;
    for result in reader.deserialize::<HeatmapIncident>() {
        match result {
            Ok(incident) => incidents.push(incident),
            Err(e) => {
                log::warn!("Skipping malformed incident row: {e}");
                skipped += 1;
            }
        }
    }

    log::info!("Read {} incidents ({skipped} skipped)", incidents.len());
    Ok(incidents)
}

/// Distinct statistic groups, sorted. Feeds the crime-type selector.
#[must_use]
pub fn crime_types(incidents: &[HeatmapIncident]) -> Vec<String> {
    incidents
        .iter()
        .filter_map(|i| i.statistic_group.as_deref())
        .filter(|g| !g.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct incident years, sorted.
#[must_use]
pub fn years(incidents: &[HeatmapIncident]) -> Vec<i32> {
    incidents
        .iter()
        .filter_map(HeatmapIncident::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Counts incidents matching `filter` per police merhav.
///
/// Incidents without a merhav are not counted.
#[must_use]
pub fn counts_by_region(
    incidents: &[HeatmapIncident],
    filter: &HeatmapFilter,
) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for incident in incidents.iter().filter(|i| filter.matches(i)) {
        let Some(merhav) = incident.police_merhav.as_deref() else {
            continue;
        };
        if merhav.trim().is_empty() {
            continue;
        }
        *counts.entry(merhav.to_string()).or_default() += 1;
    }
    counts
}

/// A boundary with the number of incidents joined onto it.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRegion<'a> {
    /// The region boundary.
    pub boundary: &'a RegionBoundary,
    /// Matching incidents, zero when the region had none.
    pub record_count: u64,
}

/// Result of joining incident counts onto boundaries.
#[derive(Debug, Clone)]
pub struct HeatmapJoin<'a> {
    /// Every boundary, in layer order.
    pub regions: Vec<JoinedRegion<'a>>,
    /// Merhav names that had incidents but no boundary.
    pub unmatched: Vec<String>,
}

/// Left-joins `counts` onto `boundaries` by exact region name.
///
/// Every boundary is kept; names with no incidents get zero. Counted
/// names with no boundary are reported in [`HeatmapJoin::unmatched`].
#[must_use]
pub fn join<'a>(
    boundaries: &'a [RegionBoundary],
    counts: &BTreeMap<String, u64>,
) -> HeatmapJoin<'a> {
    let regions: Vec<JoinedRegion<'a>> = boundaries
        .iter()
        .map(|boundary| JoinedRegion {
            boundary,
            record_count: counts.get(&boundary.name).copied().unwrap_or(0),
        })
        .collect();

    let names: BTreeSet<&str> = boundaries.iter().map(|b| b.name.as_str()).collect();
    let unmatched: Vec<String> = counts
        .keys()
        .filter(|name| !names.contains(name.as_str()))
        .cloned()
        .collect();

    if !unmatched.is_empty() {
        log::warn!(
            "{} merhavim have incidents but no boundary: {}",
            unmatched.len(),
            unmatched.join(", ")
        );
    }

    HeatmapJoin { regions, unmatched }
}

impl HeatmapJoin<'_> {
    /// Per-region counts with centroids, for label placement.
    #[must_use]
    pub fn region_counts(&self) -> Vec<RegionCount> {
        self.regions
            .iter()
            .map(|r| RegionCount {
                name: r.boundary.name.clone(),
                record_count: r.record_count,
                centroid: r.boundary.centroid,
            })
            .collect()
    }

    /// Renders the join as a `GeoJSON` feature collection.
    ///
    /// Each feature carries `name`, `record_count`, `centroid_lat`, and
    /// `centroid_lon` properties; centroid values are `null` when absent.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .regions
            .iter()
            .map(|r| {
                let mut properties = JsonMap::new();
                properties.insert("name".to_string(), r.boundary.name.clone().into());
                properties.insert("record_count".to_string(), r.record_count.into());
                properties.insert(
                    "centroid_lat".to_string(),
                    r.boundary
                        .centroid
                        .map_or(JsonValue::Null, |c| c.latitude.into()),
                );
                properties.insert(
                    "centroid_lon".to_string(),
                    r.boundary
                        .centroid
                        .map_or(JsonValue::Null, |c| c.longitude.into()),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&r.boundary.geometry))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}
