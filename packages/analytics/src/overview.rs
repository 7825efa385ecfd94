//! Category breakdowns for the overview view.

use std::collections::BTreeMap;

use crime_dashboard_analytics_models::{CategoryCount, QuarterCount, YearSelection};
use crime_dashboard_crime_models::Category;
use crime_dashboard_source_models::Dataset;

/// Returns the distinct years in the dataset, ascending.
#[must_use]
pub fn available_years(dataset: &Dataset) -> Vec<i32> {
    dataset.years().into_iter().collect()
}

/// Counts records per category.
///
/// Always returns one entry per [`Category`], in charting order, with
/// zero for categories that have no records. For
/// [`YearSelection::AllYears`] the counts are divided by the number of
/// distinct years in the dataset.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn category_counts(dataset: &Dataset, selection: YearSelection) -> Vec<CategoryCount> {
    let mut totals: BTreeMap<Category, u64> = BTreeMap::new();
    for record in dataset.records() {
        if let YearSelection::Year(year) = selection
            && record.year != year
        {
            continue;
        }
        *totals.entry(record.category).or_default() += 1;
    }

    let divisor = match selection {
        YearSelection::Year(_) => 1.0,
        YearSelection::AllYears => dataset.years().len().max(1) as f64,
    };

    Category::all()
        .iter()
        .map(|&category| CategoryCount {
            category,
            count: totals.get(&category).copied().unwrap_or(0) as f64 / divisor,
        })
        .collect()
}

/// Counts records per (category, quarter).
///
/// Only groups with at least one record are returned, ordered by category
/// then quarter. Records without a quarter are skipped. For
/// [`YearSelection::AllYears`] each group's per-year counts are averaged
/// over the years in which that group occurs.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quarter_counts(dataset: &Dataset, selection: YearSelection) -> Vec<QuarterCount> {
    let mut per_year: BTreeMap<(Category, u8), BTreeMap<i32, u64>> = BTreeMap::new();
    for record in dataset.records() {
        let Some(quarter) = record.quarter else {
            continue;
        };
        if let YearSelection::Year(year) = selection
            && record.year != year
        {
            continue;
        }
        *per_year
            .entry((record.category, quarter))
            .or_default()
            .entry(record.year)
            .or_default() += 1;
    }

    per_year
        .into_iter()
        .map(|((category, quarter), years)| {
            let total: u64 = years.values().sum();
            QuarterCount {
                category,
                quarter,
                count: total as f64 / years.len() as f64,
            }
        })
        .collect()
}
