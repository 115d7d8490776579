#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Static column catalog for the immigration map dashboard.
//!
//! Maps every dropdown label shown in the UI to its census data column.
//! The tables here are the single source of truth shared by the column
//! resolver, the dataset loader's numeric coercion, and the
//! `/api/catalog` endpoint that populates the frontend dropdowns, so
//! labels and columns can never drift apart between layers.
//!
//! Entries are ordered slices rather than maps because dropdown order
//! is part of the UI contract.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Column holding the all-periods immigrant count. Doubles as the
/// default period selection and as the "all immigrants" sentinel for
/// the origin-region dropdown.
pub const ALL_IMMIGRANTS_COLUMN: &str = "T1529";

/// Immigration period labels and their count columns.
pub const TIME_PERIODS: &[(&str, &str)] = &[
    ("All Immigrants", "T1529"),
    ("Before 1980", "T1530"),
    ("From 1980 to 1990", "T1531"),
    ("From 1991 to 2000", "T1532"),
    ("From 2001 to 2010", "T1533"),
    ("From 2011 to 2021", "T1534"),
    ("From 2011 to 2015", "T1535"),
    ("From 2016 to 2021", "T1536"),
];

/// Broad origin-region labels and their count columns. The first entry
/// is the "all immigrants" sentinel; selecting it means no region
/// filter is active.
pub const ORIGIN_REGIONS: &[(&str, &str)] = &[
    ("Total Immigrants", "T1529"),
    ("Americas", "T1545"),
    ("Europe", "T1557"),
    ("Africa", "T1574"),
    ("Asia", "T1585"),
    ("Oceania & Others", "T1603"),
];

/// Specific country-of-origin labels and their count columns. Also the
/// column set the pie breakdown iterates over.
pub const ORIGIN_COUNTRIES: &[(&str, &str)] = &[
    // Americas
    ("Brazil", "T1546"),
    ("Colombia", "T1547"),
    ("Haiti", "T1550"),
    ("Jamaica", "T1551"),
    ("Mexico", "T1552"),
    ("USA", "T1555"),
    // Europe
    ("France", "T1560"),
    ("Germany", "T1561"),
    ("Italy", "T1564"),
    ("Poland", "T1566"),
    ("Russia", "T1569"),
    ("Ukraine", "T1571"),
    ("UK", "T1572"),
    // Africa
    ("Egypt", "T1577"),
    ("Ethiopia", "T1579"),
    ("Morocco", "T1580"),
    ("Nigeria", "T1581"),
    ("Somalia", "T1582"),
    // Asia
    ("Afghanistan", "T1586"),
    ("China", "T1592"),
    ("India", "T1599"),
    ("Iran", "T1587"),
    ("Lebanon", "T1589"),
    ("Pakistan", "T1600"),
    ("Philippines", "T1596"),
    ("Syria", "T1590"),
];

/// Accessibility score columns by travel mode.
pub const ACCESSIBILITY_MODES: &[(&str, &str)] = &[
    ("Public Transit", "Transit_Accessibility"),
    ("Walking", "Walking_Accessibility"),
];

/// Composite indicator columns selectable from the "other indicators"
/// dropdown.
pub const OTHER_INDICATORS: &[(&str, &str)] = &[
    ("CIMD Score", "Average Score"),
    (
        "Essential Services Accessibility Index (ESAI)",
        "ESAI-Norm",
    ),
    ("Immigration Density Index", "IDI_ADA"),
    ("Recent Immigration Intensity", "RII_ADA"),
];

/// The five fixed periods of the per-region trend chart, in
/// chronological order. The final entry is the combined 2011-2021
/// column, not a sum of its two sub-periods.
pub const TREND_PERIODS: &[(&str, &str)] = &[
    ("Before 1980", "T1530"),
    ("1980-1990", "T1531"),
    ("1991-2000", "T1532"),
    ("2001-2010", "T1533"),
    ("2011-2021", "T1534"),
];

/// Quantile cutoff options offered by the UI. 0.0 keeps everything.
pub const QUANTILE_OPTIONS: &[(&str, f64)] = &[
    ("Top 1%", 0.99),
    ("Top 5%", 0.95),
    ("Top 10%", 0.90),
    ("Top 25%", 0.75),
    ("All", 0.0),
];

/// Named indicator columns coerced to numeric at load time, in
/// addition to every `T*`, `Transit*`, and `Walking*` column.
pub const INDICATOR_COLUMNS: &[&str] = &[
    "Average Score",
    "Average Quintile",
    "Population Weighted Score",
    "ESAI-Norm",
    "IDI_ADA",
    "RII_ADA",
];

/// Join key shared by the boundary file and the statistics CSV.
pub const JOIN_KEY_COLUMN: &str = "ADAUID";
/// Per-region summary columns attached to every map point.
pub const PROVINCE_COLUMN: &str = "PRNAME";
/// Census subdivision name column.
pub const SUBDIVISION_COLUMN: &str = "CSDNAME";
/// CIMD quintile column shown in the hover/detail summary.
pub const QUINTILE_COLUMN: &str = "Average Quintile";
/// CIMD score column shown in the hover/detail summary.
pub const SCORE_COLUMN: &str = "Average Score";

/// The "data type" meta-selector. Anything other than
/// [`DataType::ImmigrantNumber`] overrides every other dropdown and
/// maps the chosen composite column directly.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum DataType {
    /// Immigration counts; the concrete column comes from the other
    /// dropdowns via the resolver precedence.
    #[default]
    #[strum(serialize = "Immigrant number")]
    #[serde(rename = "Immigrant number")]
    ImmigrantNumber,
    /// CIMD average score.
    #[strum(serialize = "Score")]
    #[serde(rename = "Score")]
    Score,
    /// CIMD average quintile.
    #[strum(serialize = "Quintile")]
    #[serde(rename = "Quintile")]
    Quintile,
    /// Population-weighted CIMD score.
    #[strum(serialize = "Weighted Score")]
    #[serde(rename = "Weighted Score")]
    WeightedScore,
}

impl DataType {
    /// The data column this selector maps to, or `None` for
    /// [`DataType::ImmigrantNumber`] (which defers to the resolver
    /// precedence).
    #[must_use]
    pub const fn column(self) -> Option<&'static str> {
        match self {
            Self::ImmigrantNumber => None,
            Self::Score => Some("Average Score"),
            Self::Quintile => Some("Average Quintile"),
            Self::WeightedScore => Some("Population Weighted Score"),
        }
    }
}

/// Looks up the column for a label within one catalog group.
#[must_use]
pub fn column_for(group: &[(&'static str, &'static str)], label: &str) -> Option<&'static str> {
    group
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, column)| *column)
}

/// Whether a CSV header names a numeric data column.
#[must_use]
pub fn is_data_column(name: &str) -> bool {
    name.starts_with('T')
        || name.starts_with("Transit")
        || name.starts_with("Walking")
        || INDICATOR_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::str::FromStr;

    use super::*;

    #[test]
    fn period_labels_resolve_to_columns() {
        assert_eq!(column_for(TIME_PERIODS, "All Immigrants"), Some("T1529"));
        assert_eq!(column_for(TIME_PERIODS, "Before 1980"), Some("T1530"));
        assert_eq!(column_for(TIME_PERIODS, "not a period"), None);
    }

    #[test]
    fn country_columns_are_unique() {
        let columns: BTreeSet<&str> = ORIGIN_COUNTRIES.iter().map(|(_, c)| *c).collect();
        assert_eq!(columns.len(), ORIGIN_COUNTRIES.len());
    }

    #[test]
    fn trend_has_five_chronological_periods() {
        assert_eq!(TREND_PERIODS.len(), 5);
        assert_eq!(TREND_PERIODS[0], ("Before 1980", "T1530"));
        assert_eq!(TREND_PERIODS[4], ("2011-2021", "T1534"));
    }

    #[test]
    fn data_type_round_trips_through_ui_label() {
        for data_type in [
            DataType::ImmigrantNumber,
            DataType::Score,
            DataType::Quintile,
            DataType::WeightedScore,
        ] {
            let label = data_type.to_string();
            assert_eq!(DataType::from_str(&label).unwrap(), data_type);
        }
    }

    #[test]
    fn only_immigrant_number_defers_to_resolver() {
        assert_eq!(DataType::ImmigrantNumber.column(), None);
        assert_eq!(DataType::Score.column(), Some("Average Score"));
        assert_eq!(DataType::Quintile.column(), Some("Average Quintile"));
        assert_eq!(
            DataType::WeightedScore.column(),
            Some("Population Weighted Score")
        );
    }

    #[test]
    fn data_columns_cover_counts_accessibility_and_indicators() {
        assert!(is_data_column("T1529"));
        assert!(is_data_column("Transit_Accessibility"));
        assert!(is_data_column("Walking_Accessibility"));
        assert!(is_data_column("ESAI-Norm"));
        assert!(!is_data_column("PRNAME"));
        assert!(!is_data_column("CSDNAME"));
    }
}
