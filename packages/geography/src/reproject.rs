//! Conversion of boundary coordinates to WGS84 longitude/latitude.
//!
//! Layers declare their coordinate reference system in the legacy
//! `GeoJSON` `crs` member. Three systems are understood: WGS84 itself,
//! the Israeli Transverse Mercator grid (EPSG:2039) that Israeli agencies
//! publish in, and Web Mercator (EPSG:3857). Projected systems are
//! converted with `proj4rs`.

use geo::Coord;
use proj4rs::Proj;
use serde_json::Value as JsonValue;

use crate::BoundaryLoadError;

/// EPSG:2039 on GRS80, with the Israel 1993 → WGS84 position-vector
/// datum shift.
const ITM_PROJ: &str = "+proj=tmerc +lat_0=31.7343936111111 +lon_0=35.2045169444444 \
    +k=1.0000067 +x_0=219529.584 +y_0=626907.39 +ellps=GRS80 \
    +towgs84=-24.0024,-17.1032,-17.8444,-0.33077,-1.85269,1.66969,5.4248 \
    +units=m +no_defs";

/// EPSG:3857. Spherical coordinates are read as WGS84 directly.
const WEB_MERCATOR_PROJ: &str =
    "+proj=merc +a=6378137 +b=6378137 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";

const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Coordinate reference systems a boundary layer may be published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCrs {
    /// Longitude/latitude degrees (EPSG:4326, OGC CRS84).
    Wgs84,
    /// Israeli Transverse Mercator (EPSG:2039).
    IsraeliTm,
    /// Spherical Web Mercator (EPSG:3857).
    WebMercator,
}

impl SourceCrs {
    /// Resolves a CRS name such as `"urn:ogc:def:crs:EPSG::2039"`,
    /// `"EPSG:4326"`, or `"urn:ogc:def:crs:OGC:1.3:CRS84"`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryLoadError::UnsupportedCrs`] for anything else.
    pub fn from_name(name: &str) -> Result<Self, BoundaryLoadError> {
        let upper = name.trim().to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Self::Wgs84);
        }

        let code = upper.rsplit(':').next().unwrap_or_default().trim();
        match code {
            "4326" => Ok(Self::Wgs84),
            "2039" => Ok(Self::IsraeliTm),
            "3857" | "3785" | "900913" | "102100" | "102113" => Ok(Self::WebMercator),
            _ => Err(BoundaryLoadError::UnsupportedCrs(name.to_string())),
        }
    }

    /// Resolves the `crs` member of a `GeoJSON` object.
    ///
    /// A missing or `null` member means WGS84.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryLoadError::UnsupportedCrs`] if the member is
    /// present but names an unknown or unreadable CRS.
    pub fn from_geojson_member(member: Option<&JsonValue>) -> Result<Self, BoundaryLoadError> {
        let member = match member {
            None | Some(JsonValue::Null) => return Ok(Self::Wgs84),
            Some(member) => member,
        };

        let properties = &member["properties"];
        if let Some(name) = properties["name"].as_str() {
            return Self::from_name(name);
        }
        // Pre-2008 form: {"type": "EPSG", "properties": {"code": 2039}}
        if let Some(code) = properties["code"].as_i64() {
            return Self::from_name(&format!("EPSG:{code}"));
        }

        Err(BoundaryLoadError::UnsupportedCrs(member.to_string()))
    }

    const fn proj_string(self) -> Option<&'static str> {
        match self {
            Self::Wgs84 => None,
            Self::IsraeliTm => Some(ITM_PROJ),
            Self::WebMercator => Some(WEB_MERCATOR_PROJ),
        }
    }

    /// Builds the converter from this CRS to WGS84.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryLoadError::Projection`] if a projection definition
    /// is rejected.
    pub fn reprojector(self) -> Result<Reprojector, BoundaryLoadError> {
        let projections = match self.proj_string() {
            Some(source) => Some((
                Proj::from_proj_string(source)?,
                Proj::from_proj_string(WGS84_PROJ)?,
            )),
            None => None,
        };
        Ok(Reprojector { projections })
    }
}

/// Converts coordinates of one [`SourceCrs`] to WGS84 degrees.
#[derive(Debug)]
pub struct Reprojector {
    projections: Option<(Proj, Proj)>,
}

impl Reprojector {
    /// Converts one coordinate (`x` = longitude, `y` = latitude on output).
    ///
    /// Returns `None` if the conversion fails or the result is not finite.
    #[must_use]
    pub fn to_wgs84(&self, coord: Coord<f64>) -> Option<Coord<f64>> {
        let out = match &self.projections {
            None => coord,
            Some((source, target)) => {
                let mut point = (coord.x, coord.y);
                proj4rs::transform::transform(source, target, &mut point).ok()?;
                Coord {
                    x: point.0.to_degrees(),
                    y: point.1.to_degrees(),
                }
            }
        };
        (out.x.is_finite() && out.y.is_finite()).then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(crs: SourceCrs, x: f64, y: f64) -> Option<Coord<f64>> {
        crs.reprojector().unwrap().to_wgs84(Coord { x, y })
    }

    fn assert_near(out: Coord<f64>, lon: f64, lat: f64) {
        assert!((out.x - lon).abs() < 1e-5, "lon {} != {lon}", out.x);
        assert!((out.y - lat).abs() < 1e-5, "lat {} != {lat}", out.y);
    }

    #[test]
    fn resolves_crs_names() {
        assert_eq!(SourceCrs::from_name("EPSG:4326").unwrap(), SourceCrs::Wgs84);
        assert_eq!(
            SourceCrs::from_name("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(),
            SourceCrs::Wgs84
        );
        assert_eq!(
            SourceCrs::from_name("urn:ogc:def:crs:EPSG::2039").unwrap(),
            SourceCrs::IsraeliTm
        );
        assert_eq!(
            SourceCrs::from_name("EPSG:3857").unwrap(),
            SourceCrs::WebMercator
        );
        assert!(matches!(
            SourceCrs::from_name("EPSG:32636"),
            Err(BoundaryLoadError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn resolves_geojson_crs_member() {
        assert_eq!(SourceCrs::from_geojson_member(None).unwrap(), SourceCrs::Wgs84);

        let named = serde_json::json!({
            "type": "name",
            "properties": {"name": "urn:ogc:def:crs:EPSG::2039"}
        });
        assert_eq!(
            SourceCrs::from_geojson_member(Some(&named)).unwrap(),
            SourceCrs::IsraeliTm
        );

        let legacy = serde_json::json!({"type": "EPSG", "properties": {"code": 3857}});
        assert_eq!(
            SourceCrs::from_geojson_member(Some(&legacy)).unwrap(),
            SourceCrs::WebMercator
        );

        let junk = serde_json::json!({"type": "link"});
        assert!(SourceCrs::from_geojson_member(Some(&junk)).is_err());
    }

    #[test]
    fn null_crs_member_is_wgs84() {
        assert_eq!(
            SourceCrs::from_geojson_member(Some(&JsonValue::Null)).unwrap(),
            SourceCrs::Wgs84
        );
    }

    #[test]
    fn wgs84_is_identity() {
        let c = Coord { x: 34.78, y: 32.08 };
        assert_eq!(
            SourceCrs::Wgs84.reprojector().unwrap().to_wgs84(c),
            Some(c)
        );
    }

    #[test]
    fn itm_applies_datum_shift() {
        let out = convert(SourceCrs::IsraeliTm, 219_529.584, 626_907.390).unwrap();
        assert_near(out, 35.205_208, 31.734_764);

        // Without the Israel 1993 shift the grid origin lands ~77 m away,
        // on the projection origin itself.
        let unshifted = Coord {
            x: 35.204_517,
            y: 31.734_394,
        };
        assert!((out.x - unshifted.x).abs() > 5e-4, "lon {}", out.x);
        assert!((out.y - unshifted.y).abs() > 3e-4, "lat {}", out.y);
    }

    #[test]
    fn itm_points_across_israel() {
        // Tel Aviv.
        let tlv = convert(SourceCrs::IsraeliTm, 180_000.0, 665_000.0).unwrap();
        assert_near(tlv, 34.786_527, 32.077_607);
        // Haifa bay.
        let haifa = convert(SourceCrs::IsraeliTm, 200_000.0, 750_000.0).unwrap();
        assert_near(haifa, 34.996_606, 32.844_614);
        // Arava, north of Eilat.
        let arava = convert(SourceCrs::IsraeliTm, 190_000.0, 390_000.0).unwrap();
        assert_near(arava, 34.900_363, 29.597_496);
    }

    #[test]
    fn web_mercator_inverse() {
        let origin = convert(SourceCrs::WebMercator, 0.0, 0.0).unwrap();
        assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);

        let tlv = convert(SourceCrs::WebMercator, 3_871_625.0, 3_773_816.0).unwrap();
        assert_near(tlv, 34.779_399, 32.079_997);
    }

    #[test]
    fn non_finite_input_fails() {
        assert!(convert(SourceCrs::IsraeliTm, f64::NAN, 0.0).is_none());
        assert!(convert(SourceCrs::Wgs84, f64::INFINITY, 0.0).is_none());
    }
}
