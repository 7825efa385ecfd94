#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime category taxonomy and reporting period types.
//!
//! The Israel Police statistics feed publishes a fine-grained
//! `StatisticGroup` label for every record. The dashboard charts six
//! coarse [`Category`] groupings instead; each category owns a fixed set
//! of fine labels, returned by [`Category::statistic_groups`].
//!
//! Records are further split into a [`Period`] relative to the
//! 7 October 2023 cutover (Q4 2023).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// District label the source feed uses for its own nationwide rows.
pub const NATIONWIDE_SOURCE_DISTRICT: &str = "כל הארץ";

/// Reserved district label for the synthetic nationwide rollup rows
/// produced by district aggregation.
pub const ALL_DISTRICTS: &str = "כל המחוזות";

/// First year covered by the dashboard.
pub const FIRST_YEAR: i32 = 2020;

/// Year containing the cutover quarter.
pub const CUTOVER_YEAR: i32 = 2023;

/// Last quarter of [`CUTOVER_YEAR`] that still belongs to [`Period::Before`].
pub const CUTOVER_LAST_BEFORE_QUARTER: u8 = 3;

/// Number of quarters in [`Period::Before`] (Q1 2020 through Q3 2023).
pub const QUARTERS_BEFORE: u32 = 15;

/// Number of quarters in [`Period::After`] (Q4 2023 through Q4 2024).
pub const QUARTERS_AFTER: u32 = 5;

/// Coarse crime category used for charting.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Property, bodily harm, offenses against persons, sexual offenses
    GeneralCriminal,
    /// Morality and public order offenses
    MoralityPublicOrder,
    /// Security offenses
    Security,
    /// Economic, administrative, and licensing offenses
    EconomicAdministrative,
    /// Traffic offenses
    Traffic,
    /// Fraud offenses
    Fraud,
}

impl Category {
    /// Returns all variants of this enum, in charting order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GeneralCriminal,
            Self::MoralityPublicOrder,
            Self::Security,
            Self::EconomicAdministrative,
            Self::Traffic,
            Self::Fraud,
        ]
    }

    /// Returns the Hebrew display name of this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GeneralCriminal => "עבירות פליליות כלליות",
            Self::MoralityPublicOrder => "עבירות מוסר וסדר ציבורי",
            Self::Security => "עבירות ביטחון",
            Self::EconomicAdministrative => "עבירות כלכליות ומנהליות",
            Self::Traffic => "עבירות תנועה",
            Self::Fraud => "עבירות מרמה",
        }
    }

    /// Returns the source-feed `StatisticGroup` labels that belong to this
    /// category.
    ///
    /// No label appears under more than one category.
    #[must_use]
    pub const fn statistic_groups(self) -> &'static [&'static str] {
        match self {
            Self::GeneralCriminal => &[
                "עבירות כלפי הרכוש",
                "עבירות נגד גוף",
                "עבירות נגד אדם",
                "עבירות מין",
            ],
            Self::MoralityPublicOrder => &["עבירות כלפי המוסר", "עבירות סדר ציבורי"],
            Self::Security => &["עבירות בטחון"],
            Self::EconomicAdministrative => &["עבירות כלכליות", "עבירות מנהליות", "עבירות רשוי"],
            Self::Traffic => &["עבירות תנועה"],
            Self::Fraud => &["עבירות מרמה"],
        }
    }
}

/// Reporting period relative to the Q4 2023 cutover.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    /// Q1 2020 through Q3 2023
    Before,
    /// Q4 2023 through Q4 2024
    After,
}

impl Period {
    /// Classifies a year and quarter.
    ///
    /// A cutover-year record without a quarter is [`Period::Before`].
    #[must_use]
    pub fn from_year_quarter(year: i32, quarter: Option<u8>) -> Self {
        match year.cmp(&CUTOVER_YEAR) {
            std::cmp::Ordering::Less => Self::Before,
            std::cmp::Ordering::Greater => Self::After,
            std::cmp::Ordering::Equal => match quarter {
                Some(q) if q > CUTOVER_LAST_BEFORE_QUARTER => Self::After,
                _ => Self::Before,
            },
        }
    }

    /// Returns the number of quarters this period spans.
    #[must_use]
    pub const fn quarter_count(self) -> u32 {
        match self {
            Self::Before => QUARTERS_BEFORE,
            Self::After => QUARTERS_AFTER,
        }
    }
}
