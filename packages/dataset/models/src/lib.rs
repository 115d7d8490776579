#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Row and selection types shared by the dataset loader, the analytics
//! stage, and the server.

use std::collections::BTreeMap;

use immigration_map_catalog::{ALL_IMMIGRANTS_COLUMN, DataType};
use serde::{Deserialize, Serialize};

/// One census Aggregate Dissemination Area with its joined statistics.
///
/// Numeric columns live in `values`; a missing key means the value is
/// absent for this region (blank or unparseable in the source CSV).
/// Geometry is kept separately in the render `FeatureCollection` and
/// linked by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRecord {
    /// ADAUID join key, unique across the dataset.
    pub id: String,
    /// Province name (`PRNAME`).
    pub province: String,
    /// Census subdivision name (`CSDNAME`).
    pub subdivision: String,
    /// Numeric indicator columns by census column name.
    pub values: BTreeMap<String, f64>,
}

impl RegionRecord {
    /// The region's value for a data column, if present.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// The current UI dropdown state, read-only input to the column
/// resolver. One `Selection` is built per map recomputation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Period count column from the period dropdown.
    pub period: String,
    /// Origin-region count column; `T1529` means no region filter.
    pub region: String,
    /// Origin-country count column, if one is selected.
    pub country: Option<String>,
    /// Accessibility score column, if a mode is selected.
    pub accessibility: Option<String>,
    /// Quantile cutoff in `0.0..=0.99`; 0.0 keeps all rows.
    pub quantile: f64,
    /// The data-type meta-selector.
    pub data_type: DataType,
    /// Composite indicator column, if one is selected.
    pub indicator: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            period: ALL_IMMIGRANTS_COLUMN.to_string(),
            region: ALL_IMMIGRANTS_COLUMN.to_string(),
            country: None,
            accessibility: None,
            quantile: 0.0,
            data_type: DataType::default(),
            indicator: None,
        }
    }
}
