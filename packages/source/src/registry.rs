//! Source registry — loads all yearly dataset definitions from embedded
//! TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. Publishing a new year is as simple
//! as creating a new TOML file and adding it to the list below.

use crate::source_def::{YearSource, parse_source_toml};

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("police_2020", include_str!("../sources/police_2020.toml")),
    ("police_2021", include_str!("../sources/police_2021.toml")),
    ("police_2022", include_str!("../sources/police_2022.toml")),
    ("police_2023", include_str!("../sources/police_2023.toml")),
    ("police_2024", include_str!("../sources/police_2024.toml")),
];

/// Total number of configured sources (used in tests).
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 5;

/// Returns all configured year sources, ordered by year.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sources() -> Vec<YearSource> {
    let mut sources: Vec<YearSource> = SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect();
    sources.sort_by_key(|s| s.year);
    sources
}
