#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the immigration map server.
//!
//! These types are serialized to JSON for the REST API. They are
//! separate from the internal record and filter types to allow
//! independent evolution of the API contract.

use immigration_map_analytics::{FilteredRow, PieSlice, TrendPoint};
use immigration_map_catalog::{
    ALL_IMMIGRANTS_COLUMN, QUINTILE_COLUMN, SCORE_COLUMN,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the map endpoint. All parameters are optional;
/// absent ones fall back to the initial UI state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Period count column.
    pub period: Option<String>,
    /// Origin-region count column.
    pub region: Option<String>,
    /// Origin-country count column.
    pub country: Option<String>,
    /// Accessibility score column.
    pub accessibility: Option<String>,
    /// Quantile cutoff, `0.0..=0.99`.
    pub quantile: Option<f64>,
    /// Data-type label (e.g. `Immigrant number`, `Score`).
    pub data_type: Option<String>,
    /// Composite indicator column.
    pub indicator: Option<String>,
}

/// The choropleth payload returned by the map endpoint.
///
/// "No data" and handler failures produce a placeholder with an
/// explanatory title and no points, never an HTTP error, so the
/// frontend keeps rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    /// Map display title, or the placeholder message.
    pub title: String,
    /// The resolved data column, absent on placeholders.
    pub column: Option<String>,
    /// Color-scale upper bound, absent on placeholders.
    pub zmax: Option<f64>,
    /// One entry per kept region.
    pub points: Vec<MapPoint>,
}

impl MapResponse {
    /// A placeholder payload with no points.
    #[must_use]
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            column: None,
            zmax: None,
            points: Vec::new(),
        }
    }
}

/// One region on the map, with the metadata the frontend attaches to
/// each point for hover and click handling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// ADAUID region id.
    pub id: String,
    /// Value in the resolved column (drives the color).
    pub value: f64,
    /// Province name.
    pub province: String,
    /// Census subdivision name.
    pub subdivision: String,
    /// All-periods immigrant count, if present.
    pub total_immigrants: Option<f64>,
    /// Share of the kept total, 0-100.
    pub percent_of_total: f64,
    /// CIMD quintile, if present.
    pub quintile: Option<f64>,
    /// CIMD score, if present.
    pub score: Option<f64>,
}

impl From<&FilteredRow> for MapPoint {
    fn from(row: &FilteredRow) -> Self {
        Self {
            id: row.record.id.clone(),
            value: row.value,
            province: row.record.province.clone(),
            subdivision: row.record.subdivision.clone(),
            total_immigrants: row.record.value(ALL_IMMIGRANTS_COLUMN),
            percent_of_total: row.percent_of_total,
            quintile: row.record.value(QUINTILE_COLUMN),
            score: row.record.value(SCORE_COLUMN),
        }
    }
}

/// The detail-panel payload returned for a clicked region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetailResponse {
    /// Guidance text when there is no usable click context (no cached
    /// filter set, or the id is not in it).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Text summary for the clicked region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RegionSummary>,
    /// Pie slices, when the region has origin data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie: Option<Vec<ApiPieSlice>>,
    /// Pie panel no-data message, when it has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie_message: Option<String>,
    /// Trend points, when the region has trend data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<ApiTrendPoint>>,
    /// Trend panel no-data message, when it has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_message: Option<String>,
}

impl RegionDetailResponse {
    /// The guidance payload shown before any usable click.
    #[must_use]
    pub fn guidance() -> Self {
        Self {
            message: Some("Click on a region to see details.".to_string()),
            summary: None,
            pie: None,
            pie_message: None,
            trend: None,
            trend_message: None,
        }
    }
}

/// Text summary of a clicked region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    /// ADAUID region id.
    pub id: String,
    /// Province name.
    pub province: String,
    /// Census subdivision name.
    pub subdivision: String,
    /// All-periods immigrant count, if present.
    pub total_immigrants: Option<f64>,
    /// Share of the kept total, 0-100.
    pub percent_of_total: f64,
    /// CIMD quintile, if present.
    pub quintile: Option<f64>,
    /// CIMD score, if present.
    pub score: Option<f64>,
}

impl From<&FilteredRow> for RegionSummary {
    fn from(row: &FilteredRow) -> Self {
        Self {
            id: row.record.id.clone(),
            province: row.record.province.clone(),
            subdivision: row.record.subdivision.clone(),
            total_immigrants: row.record.value(ALL_IMMIGRANTS_COLUMN),
            percent_of_total: row.percent_of_total,
            quintile: row.record.value(QUINTILE_COLUMN),
            score: row.record.value(SCORE_COLUMN),
        }
    }
}

/// One pie slice as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPieSlice {
    /// Country label, or the "Others" bucket label.
    pub label: String,
    /// Absolute count.
    pub value: f64,
}

impl From<PieSlice> for ApiPieSlice {
    fn from(slice: PieSlice) -> Self {
        Self {
            label: slice.label,
            value: slice.value,
        }
    }
}

/// One trend bar as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrendPoint {
    /// Period label.
    pub label: String,
    /// Immigrant count for the period.
    pub value: f64,
}

impl From<TrendPoint> for ApiTrendPoint {
    fn from(point: TrendPoint) -> Self {
        Self {
            label: point.label.to_string(),
            value: point.value,
        }
    }
}

/// One dropdown option in the catalog response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOption {
    /// Human-readable dropdown label.
    pub label: String,
    /// The column the label maps to.
    pub column: String,
}

impl From<&(&str, &str)> for CatalogOption {
    fn from(&(label, column): &(&str, &str)) -> Self {
        Self {
            label: label.to_string(),
            column: column.to_string(),
        }
    }
}

/// One quantile option in the catalog response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantileOption {
    /// Human-readable label (e.g. `Top 5%`).
    pub label: String,
    /// Quantile value in `0.0..=0.99`.
    pub value: f64,
}

/// Everything the frontend needs to populate its dropdowns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    /// Immigration period options.
    pub periods: Vec<CatalogOption>,
    /// Broad origin-region options.
    pub regions: Vec<CatalogOption>,
    /// Specific origin-country options.
    pub countries: Vec<CatalogOption>,
    /// Accessibility mode options.
    pub accessibility_modes: Vec<CatalogOption>,
    /// Composite indicator options.
    pub other_indicators: Vec<CatalogOption>,
    /// Data-type selector labels.
    pub data_types: Vec<String>,
    /// Quantile cutoff options.
    pub quantiles: Vec<QuantileOption>,
}
