//! Nationwide rollup across police districts.

use std::collections::BTreeMap;

use crime_dashboard_analytics_models::DistrictCount;
use crime_dashboard_crime_models::{ALL_DISTRICTS, Category, NATIONWIDE_SOURCE_DISTRICT, Period};

/// Whether a district label names an actual police district.
///
/// Blank labels and the feed's own nationwide label are not districts.
#[must_use]
pub fn is_genuine_district(label: &str) -> bool {
    let label = label.trim();
    !label.is_empty() && label != NATIONWIDE_SOURCE_DISTRICT
}

/// Adds one synthetic [`ALL_DISTRICTS`] row per (category, period).
///
/// Rows without a genuine district are dropped first. The remaining rows
/// are returned unchanged, followed by the synthetic rows whose counts are
/// the per-group sums. Nothing is deduplicated, so the output holds
/// `filtered + distinct (category, period) pairs` rows.
#[must_use]
pub fn aggregate(rows: Vec<DistrictCount>) -> Vec<DistrictCount> {
    let filtered: Vec<DistrictCount> = rows
        .into_iter()
        .filter(|row| is_genuine_district(&row.police_district))
        .collect();

    let mut totals: BTreeMap<(Category, Period), u64> = BTreeMap::new();
    for row in &filtered {
        *totals.entry((row.category, row.period)).or_default() += row.count;
    }

    log::debug!(
        "District rollup: {} district rows, {} nationwide rows",
        filtered.len(),
        totals.len()
    );

    let mut out = filtered;
    out.extend(
        totals
            .into_iter()
            .map(|((category, period), count)| DistrictCount {
                category,
                period,
                police_district: ALL_DISTRICTS.to_string(),
                count,
            }),
    );
    out
}
