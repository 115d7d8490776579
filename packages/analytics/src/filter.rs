//! Quantile filtering and percentage-of-total aggregation.

use std::collections::BTreeMap;

use immigration_map_dataset_models::{RegionRecord, Selection};

use crate::resolve::resolve_column;

/// One region that passed the current filter, carrying the full record
/// so a later click can build the detail panel without recomputing.
#[derive(Debug, Clone)]
pub struct FilteredRow {
    /// The full joined record.
    pub record: RegionRecord,
    /// The region's value in the resolved column.
    pub value: f64,
    /// Share of the kept total, as a 0-100 percentage.
    pub percent_of_total: f64,
}

/// The rows that passed the current filter, plus everything the map
/// payload needs. Replaced wholesale on every recomputation and read
/// without modification by click handlers.
#[derive(Debug, Clone)]
pub struct FilteredSet {
    /// The resolved data column.
    pub column: String,
    /// Display title for the map.
    pub title: String,
    /// Color-scale upper bound: the 99th percentile of kept values, so
    /// a handful of extreme regions cannot wash out the scale.
    pub zmax: f64,
    rows: Vec<FilteredRow>,
    index: BTreeMap<String, usize>,
}

impl FilteredSet {
    /// All kept rows, in dataset order.
    #[must_use]
    pub fn rows(&self) -> &[FilteredRow] {
        &self.rows
    }

    /// Looks up a kept row by region id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FilteredRow> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    /// Number of kept rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolves the selection's column, filters the records by the
/// selected quantile, and computes the derived fields.
///
/// Rows missing the resolved column are dropped first. The threshold
/// is the value at the selected quantile of the remaining values;
/// rows at or above it are kept, so raising the quantile never grows
/// the kept set. Returns `None` when nothing survives ("no data").
#[must_use]
pub fn filter_regions(records: &[RegionRecord], selection: &Selection) -> Option<FilteredSet> {
    let resolved = resolve_column(selection);

    let mut present: Vec<(&RegionRecord, f64)> = records
        .iter()
        .filter_map(|r| r.value(&resolved.column).map(|v| (r, v)))
        .collect();
    if present.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = present.iter().map(|(_, v)| *v).collect();
    sorted.sort_by(f64::total_cmp);
    let threshold = quantile(&sorted, selection.quantile);

    present.retain(|(_, v)| *v >= threshold);
    if present.is_empty() {
        return None;
    }

    let mut kept_sorted: Vec<f64> = present.iter().map(|(_, v)| *v).collect();
    kept_sorted.sort_by(f64::total_cmp);

    let mut zmax = quantile(&kept_sorted, 0.99);
    if zmax <= 0.0 {
        zmax = *kept_sorted.last().unwrap_or(&0.0);
    }

    let total: f64 = kept_sorted.iter().sum();

    let rows: Vec<FilteredRow> = present
        .into_iter()
        .map(|(record, value)| FilteredRow {
            record: record.clone(),
            value,
            percent_of_total: if total > 0.0 {
                round4(value / total) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    let index = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.record.id.clone(), i))
        .collect();

    Some(FilteredSet {
        column: resolved.column,
        title: resolved.title,
        zmax,
        rows,
        index,
    })
}

/// Value at quantile `q` of an ascending-sorted slice, linearly
/// interpolated between the two nearest order statistics.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let q = q.clamp(0.0, 1.0);

    #[allow(clippy::cast_precision_loss)]
    let position = q * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = position - position.floor();

    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Rounds to four decimal places.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
