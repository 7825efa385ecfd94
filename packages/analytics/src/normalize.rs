//! Per-quarter normalization of period tallies.
//!
//! The before window spans 15 quarters and the after window 5, so raw
//! tallies are divided by the window length to compare volumes.

use crime_dashboard_analytics_models::{DistrictCount, NormalizedDistrictCount};
use crime_dashboard_crime_models::Period;

/// Divides `count` by the number of quarters in `period`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalized_count(period: Period, count: u64) -> f64 {
    count as f64 / f64::from(period.quarter_count())
}

/// Attaches a normalized count to every row.
#[must_use]
pub fn normalize(rows: Vec<DistrictCount>) -> Vec<NormalizedDistrictCount> {
    rows.into_iter()
        .map(|row| NormalizedDistrictCount {
            normalized_count: normalized_count(row.period, row.count),
            category: row.category,
            period: row.period,
            police_district: row.police_district,
            count: row.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crime_dashboard_crime_models::Category;

    use super::*;

    #[test]
    fn divides_by_window_length() {
        assert!((normalized_count(Period::Before, 30) - 2.0).abs() < f64::EPSILON);
        assert!((normalized_count(Period::After, 30) - 6.0).abs() < f64::EPSILON);
        assert!((normalized_count(Period::Before, 1) - 1.0 / 15.0).abs() < f64::EPSILON);
        assert!(normalized_count(Period::After, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn keeps_row_fields() {
        let rows = normalize(vec![DistrictCount {
            category: Category::Security,
            period: Period::After,
            police_district: "מחוז מרכז".to_string(),
            count: 12,
        }]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 12);
        assert_eq!(rows[0].police_district, "מחוז מרכז");
        assert!((rows[0].normalized_count - 2.4).abs() < 1e-12);
    }
}
