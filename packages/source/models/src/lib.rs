#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feed record types and the canonical categorized crime record.
//!
//! [`RawRecord`] mirrors one element of a CKAN `result.records` array.
//! The loader turns each raw record into a [`CrimeRecord`] once its
//! `StatisticGroup` maps to a [`Category`]; the full multi-year result is
//! wrapped in an immutable [`Dataset`] that is passed explicitly to every
//! transformation.

use std::collections::BTreeSet;
use std::fmt;

use crime_dashboard_crime_models::{Category, Period};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// One record as published by the statistics datastore.
///
/// Every field is optional; the feed occasionally omits or nulls them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Fine-grained crime-type label.
    #[serde(
        rename = "StatisticGroup",
        default,
        deserialize_with = "lenient_string"
    )]
    pub statistic_group: Option<String>,
    /// Quarter text (e.g. `"Q1"` or `"רבעון 1"`).
    #[serde(rename = "Quarter", default, deserialize_with = "lenient_string")]
    pub quarter: Option<String>,
    /// Police district name.
    #[serde(
        rename = "PoliceDistrict",
        default,
        deserialize_with = "lenient_string"
    )]
    pub police_district: Option<String>,
    /// Police merhav (sub-district region) name.
    #[serde(
        rename = "PoliceMerhav",
        default,
        deserialize_with = "lenient_string"
    )]
    pub police_merhav: Option<String>,
}

/// A categorized crime record.
///
/// Only records whose statistic group maps to a [`Category`] exist in this
/// form, so every downstream aggregate sees one of the six categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Fine-grained crime-type label from the feed.
    pub statistic_group: String,
    /// Coarse category derived from `statistic_group`.
    pub category: Category,
    /// Year of the dataset the record was fetched from.
    pub year: i32,
    /// Quarter within the year (1-4), if the feed provided a usable one.
    pub quarter: Option<u8>,
    /// Police district name.
    pub police_district: String,
    /// Police merhav name.
    pub police_merhav: String,
}

impl CrimeRecord {
    /// Returns the before/after bucket for this record.
    #[must_use]
    pub fn period(&self) -> Period {
        Period::from_year_quarter(self.year, self.quarter)
    }
}

/// The immutable, fully loaded set of crime records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<CrimeRecord>,
}

impl Dataset {
    /// Wraps an already categorized set of records.
    #[must_use]
    pub const fn new(records: Vec<CrimeRecord>) -> Self {
        Self { records }
    }

    /// Returns all records.
    #[must_use]
    pub fn records(&self) -> &[CrimeRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the distinct years present, ascending.
    #[must_use]
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.year).collect()
    }
}

impl FromIterator<CrimeRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = CrimeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Accepts a JSON string, number, or null as an optional string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientString;

    impl<'de> Visitor<'de> for LenientString {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(Self)
        }
    }

    deserializer.deserialize_any(LenientString)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_reads_feed_field_names() {
        let raw: RawRecord = serde_json::from_str(
            r#"{"_id": 7, "StatisticGroup": "עבירות תנועה", "Quarter": "Q2",
                "PoliceDistrict": "מחוז מרכז", "PoliceMerhav": "מרחב שרון",
                "Yeshuv": "נתניה"}"#,
        )
        .unwrap();
        assert_eq!(raw.statistic_group.as_deref(), Some("עבירות תנועה"));
        assert_eq!(raw.quarter.as_deref(), Some("Q2"));
        assert_eq!(raw.police_district.as_deref(), Some("מחוז מרכז"));
        assert_eq!(raw.police_merhav.as_deref(), Some("מרחב שרון"));
    }

    #[test]
    fn raw_record_tolerates_nulls_numbers_and_missing_fields() {
        let raw: RawRecord =
            serde_json::from_str(r#"{"StatisticGroup": null, "Quarter": 3}"#).unwrap();
        assert_eq!(raw.statistic_group, None);
        assert_eq!(raw.quarter.as_deref(), Some("3"));
        assert_eq!(raw.police_district, None);
    }

    #[test]
    fn dataset_years_are_distinct_and_sorted() {
        let record = |year| CrimeRecord {
            statistic_group: "עבירות מרמה".to_string(),
            category: Category::Fraud,
            year,
            quarter: Some(1),
            police_district: String::new(),
            police_merhav: String::new(),
        };
        let dataset: Dataset = [record(2022), record(2020), record(2022)]
            .into_iter()
            .collect();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.years().into_iter().collect::<Vec<_>>(), [2020, 2022]);
    }
}
