//! Police region boundary loading.
//!
//! The boundary archive is a zip file with one `GeoJSON` document per
//! layer, named `<layer>.geojson` (or `.json`) in any directory of the
//! archive. The selected layer is parsed, reprojected to WGS84, and each
//! region gets a centroid for label placement.

use std::io::{Read, Seek};
use std::path::Path;

use crime_dashboard_geography_models::LatLng;
use geo::{Centroid, MapCoords, MultiPolygon};
use geojson::{Feature, GeoJson};
use serde_json::Value as JsonValue;

use crate::BoundaryLoadError;
use crate::reproject::{Reprojector, SourceCrs};

/// Layer holding the police merhav boundaries.
pub const DEFAULT_LAYER: &str = "PoliceMerhavBoundaries";

/// Feature property naming the merhav.
pub const DEFAULT_NAME_FIELD: &str = "MerhavName";

const LAYER_EXTENSIONS: &[&str] = &["geojson", "json"];

/// Which layer to read and which property names its regions.
#[derive(Debug, Clone, Copy)]
pub struct LayerConfig<'a> {
    /// Layer (file stem) inside the archive.
    pub layer: &'a str,
    /// Feature property used as the region name.
    pub name_field: &'a str,
}

impl Default for LayerConfig<'_> {
    fn default() -> Self {
        Self {
            layer: DEFAULT_LAYER,
            name_field: DEFAULT_NAME_FIELD,
        }
    }
}

/// One region's boundary in WGS84.
#[derive(Debug, Clone)]
pub struct RegionBoundary {
    /// Region name, the join key for incident counts.
    pub name: String,
    /// Region outline (longitude = x, latitude = y).
    pub geometry: MultiPolygon<f64>,
    /// Area-weighted centroid, `None` for degenerate geometry.
    pub centroid: Option<LatLng>,
}

/// Loads a layer from the boundary archive at `path`.
///
/// # Errors
///
/// * [`BoundaryLoadError::ArchiveNotFound`] if `path` does not exist
/// * any error from [`read_layer`]
pub fn load_layer(
    path: &Path,
    config: &LayerConfig<'_>,
) -> Result<Vec<RegionBoundary>, BoundaryLoadError> {
    if !path.exists() {
        return Err(BoundaryLoadError::ArchiveNotFound(
            path.display().to_string(),
        ));
    }

    log::info!(
        "Loading boundary layer '{}' from {}",
        config.layer,
        path.display()
    );
    let file = std::fs::File::open(path)?;
    read_layer(std::io::BufReader::new(file), config)
}

/// Reads a layer from a zip archive.
///
/// Features without the name property or without polygonal geometry are
/// skipped with a warning.
///
/// # Errors
///
/// * [`BoundaryLoadError::Archive`] if the reader is not a zip archive
/// * [`BoundaryLoadError::LayerNotFound`] if no entry matches the layer
/// * [`BoundaryLoadError::GeoJson`] / [`BoundaryLoadError::NotFeatureCollection`]
///   if the entry is not a `GeoJSON` feature collection
/// * [`BoundaryLoadError::UnsupportedCrs`], [`BoundaryLoadError::Projection`], or
///   [`BoundaryLoadError::Reprojection`] if coordinates cannot be brought to WGS84
pub fn read_layer<R: Read + Seek>(
    reader: R,
    config: &LayerConfig<'_>,
) -> Result<Vec<RegionBoundary>, BoundaryLoadError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let entry_names: Vec<String> = archive.file_names().map(str::to_string).collect();

    let Some(entry_name) = entry_names
        .iter()
        .find(|name| layer_of(name).is_some_and(|layer| layer.eq_ignore_ascii_case(config.layer)))
    else {
        let mut available: Vec<String> = entry_names
            .iter()
            .filter_map(|name| layer_of(name))
            .map(str::to_string)
            .collect();
        available.sort();
        available.dedup();
        return Err(BoundaryLoadError::LayerNotFound {
            layer: config.layer.to_string(),
            available,
        });
    };

    let mut text = String::new();
    archive.by_name(entry_name)?.read_to_string(&mut text)?;

    parse_layer(&text, config)
}

/// The layer name of an archive entry, if it is a `GeoJSON` file.
fn layer_of(entry_name: &str) -> Option<&str> {
    if entry_name.ends_with('/') {
        return None;
    }
    let path = Path::new(entry_name);
    let extension = path.extension()?.to_str()?;
    if !LAYER_EXTENSIONS
        .iter()
        .any(|ext| extension.eq_ignore_ascii_case(ext))
    {
        return None;
    }
    path.file_stem()?.to_str()
}

fn parse_layer(
    text: &str,
    config: &LayerConfig<'_>,
) -> Result<Vec<RegionBoundary>, BoundaryLoadError> {
    let geojson: GeoJson = text.parse().map_err(Box::new)?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(BoundaryLoadError::NotFeatureCollection {
            layer: config.layer.to_string(),
        });
    };

    let crs = SourceCrs::from_geojson_member(
        collection
            .foreign_members
            .as_ref()
            .and_then(|members| members.get("crs")),
    )?;
    log::debug!(
        "Layer '{}': {} features, {crs:?}",
        config.layer,
        collection.features.len()
    );
    let reprojector = crs.reprojector()?;

    let mut regions = Vec::with_capacity(collection.features.len());
    let mut skipped = 0_usize;

    for feature in collection.features {
        let Some(name) = feature_name(&feature, config.name_field) else {
            log::warn!(
                "Skipping feature without '{}' in layer '{}'",
                config.name_field,
                config.layer
            );
            skipped += 1;
            continue;
        };

        let Some(geometry) = feature_polygons(feature) else {
            log::warn!("Skipping region '{name}': no polygon geometry");
            skipped += 1;
            continue;
        };

        let geometry = reproject(&geometry, &reprojector, &name)?;
        let centroid = geometry.centroid().map(|p| LatLng {
            latitude: p.y(),
            longitude: p.x(),
        });

        regions.push(RegionBoundary {
            name,
            geometry,
            centroid,
        });
    }

    log::info!(
        "Loaded {} regions from layer '{}' ({skipped} skipped)",
        regions.len(),
        config.layer
    );

    Ok(regions)
}

fn feature_name(feature: &Feature, name_field: &str) -> Option<String> {
    match feature.property(name_field)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn feature_polygons(feature: Feature) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = feature.geometry?.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

fn reproject(
    geometry: &MultiPolygon<f64>,
    reprojector: &Reprojector,
    region: &str,
) -> Result<MultiPolygon<f64>, BoundaryLoadError> {
    geometry
        .try_map_coords(|coord| reprojector.to_wgs84(coord).ok_or(()))
        .map_err(|()| BoundaryLoadError::Reprojection {
            region: region.to_string(),
        })
}


#[cfg(test)]
mod tests {
    use super::test_support::{collection, square_feature, zip_archive};
    use super::*;

    #[test]
    fn reads_wgs84_layer_from_nested_directory() {
        let layer = collection(
            vec![
                square_feature("מרחב ירקון", 34.8, 32.0, 0.1),
                square_feature("מרחב שרון", 34.9, 32.2, 0.2),
            ],
            None,
        );
        let archive = zip_archive(&[
            ("PoliceStationBoundaries/README.txt", "boundaries"),
            ("PoliceStationBoundaries/PoliceMerhavBoundaries.geojson", layer.as_str()),
        ]);

        let regions = read_layer(archive, &LayerConfig::default()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "מרחב ירקון");

        let centroid = regions[0].centroid.unwrap();
        assert!((centroid.latitude - 32.05).abs() < 1e-9);
        assert!((centroid.longitude - 34.85).abs() < 1e-9);
    }

    #[test]
    fn reprojects_itm_layer() {
        // 2 km square centered on the ITM false origin.
        let layer = collection(
            vec![square_feature("מרחב מרכז", 218_529.584, 625_907.390, 2000.0)],
            Some("urn:ogc:def:crs:EPSG::2039"),
        );
        let archive = zip_archive(&[("PoliceMerhavBoundaries.geojson", layer.as_str())]);

        let regions = read_layer(archive, &LayerConfig::default()).unwrap();
        let centroid = regions[0].centroid.unwrap();
        assert!((centroid.latitude - 31.7344).abs() < 0.01, "{centroid:?}");
        assert!((centroid.longitude - 35.2045).abs() < 0.01, "{centroid:?}");
    }

    #[test]
    fn custom_layer_and_name_field() {
        let feature = serde_json::json!({
            "type": "Feature",
            "properties": {"NAME": "Eilat"},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[[[34.9, 29.5], [35.0, 29.5], [35.0, 29.6], [34.9, 29.5]]]]
            }
        });
        let layer = collection(vec![feature], None);
        let archive = zip_archive(&[("Stations.json", layer.as_str())]);

        let config = LayerConfig {
            layer: "Stations",
            name_field: "NAME",
        };
        let regions = read_layer(archive, &config).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Eilat");
    }

    #[test]
    fn skips_unnamed_and_non_polygon_features() {
        let unnamed = serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": [34.8, 32.0]}
        });
        let point = serde_json::json!({
            "type": "Feature",
            "properties": {"MerhavName": "נקודה"},
            "geometry": {"type": "Point", "coordinates": [34.8, 32.0]}
        });
        let layer = collection(
            vec![unnamed, point, square_feature("מרחב ירקון", 34.8, 32.0, 0.1)],
            None,
        );
        let archive = zip_archive(&[("PoliceMerhavBoundaries.geojson", layer.as_str())]);

        let regions = read_layer(archive, &LayerConfig::default()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "מרחב ירקון");
    }

    #[test]
    fn missing_layer_lists_available() {
        let layer = collection(vec![], None);
        let archive = zip_archive(&[
            ("a/PoliceDistrictBoundaries.geojson", layer.as_str()),
            ("a/PoliceStationBoundaries.geojson", layer.as_str()),
        ]);

        let err = read_layer(archive, &LayerConfig::default()).unwrap_err();
        match err {
            BoundaryLoadError::LayerNotFound { layer, available } => {
                assert_eq!(layer, DEFAULT_LAYER);
                assert_eq!(
                    available,
                    vec!["PoliceDistrictBoundaries", "PoliceStationBoundaries"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_unsupported_crs() {
        let layer = collection(
            vec![square_feature("x", 0.0, 0.0, 1.0)],
            Some("EPSG:32636"),
        );
        let archive = zip_archive(&[("PoliceMerhavBoundaries.geojson", layer.as_str())]);
        assert!(matches!(
            read_layer(archive, &LayerConfig::default()),
            Err(BoundaryLoadError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn null_crs_reads_as_wgs84() {
        let mut fc: serde_json::Value =
            serde_json::from_str(&collection(vec![square_feature("x", 34.8, 32.0, 0.2)], None))
                .unwrap();
        fc["crs"] = serde_json::Value::Null;
        let layer = fc.to_string();
        let archive = zip_archive(&[("PoliceMerhavBoundaries.geojson", layer.as_str())]);

        let regions = read_layer(archive, &LayerConfig::default()).unwrap();
        let centroid = regions[0].centroid.unwrap();
        assert!((centroid.latitude - 32.1).abs() < 1e-9, "{centroid:?}");
        assert!((centroid.longitude - 34.9).abs() < 1e-9, "{centroid:?}");
    }

    #[test]
    fn rejects_non_collection_layer() {
        let geometry = r#"{"type": "Point", "coordinates": [34.8, 32.0]}"#;
        let archive = zip_archive(&[("PoliceMerhavBoundaries.geojson", geometry)]);
        assert!(matches!(
            read_layer(archive, &LayerConfig::default()),
            Err(BoundaryLoadError::NotFeatureCollection { .. })
        ));
    }

    #[test]
    fn rejects_non_zip_input() {
        let reader = std::io::Cursor::new(b"not a zip".to_vec());
        assert!(matches!(
            read_layer(reader, &LayerConfig::default()),
            Err(BoundaryLoadError::Archive(_))
        ));
    }

    #[test]
    fn missing_archive_file() {
        let err = load_layer(
            Path::new("/nonexistent/police_boundaries.zip"),
            &LayerConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BoundaryLoadError::ArchiveNotFound(_)));
    }
}
