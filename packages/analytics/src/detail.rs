//! Per-region drill-down series: the country-of-origin pie breakdown
//! and the fixed five-period immigration trend.

use immigration_map_catalog::{ORIGIN_COUNTRIES, TREND_PERIODS};
use immigration_map_dataset_models::RegionRecord;

/// Label of the bucket collecting countries below the share cutoff.
pub const OTHERS_LABEL: &str = "Others (<2%)";

/// Minimum share (percent of the region's origin total) for a country
/// to get its own pie slice.
const OTHERS_SHARE_CUTOFF: f64 = 2.0;

/// One pie slice, carrying the absolute immigrant count.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// Country label, or [`OTHERS_LABEL`].
    pub label: String,
    /// Absolute count for the slice.
    pub value: f64,
}

/// One bar of the trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// Fixed period label.
    pub label: &'static str,
    /// Immigrant count for the period; 0 when the source value is
    /// absent.
    pub value: f64,
}

/// Buckets a region's origin-country counts into pie slices.
///
/// Only positive, present values participate. Countries whose share of
/// the positive total exceeds 2% are plotted individually by absolute
/// value; the rest are summed into one "Others" slice, included only
/// if positive. Returns `None` when the region has no positive origin
/// data at all.
#[must_use]
pub fn origin_breakdown(record: &RegionRecord) -> Option<Vec<PieSlice>> {
    let total: f64 = ORIGIN_COUNTRIES
        .iter()
        .filter_map(|(_, column)| record.value(column))
        .filter(|v| *v > 0.0)
        .sum();
    if total <= 0.0 {
        return None;
    }

    let mut slices = Vec::new();
    let mut others = 0.0;
    for (label, column) in ORIGIN_COUNTRIES {
        let Some(value) = record.value(column) else {
            continue;
        };
        if value <= 0.0 {
            continue;
        }
        if value / total * 100.0 > OTHERS_SHARE_CUTOFF {
            slices.push(PieSlice {
                label: (*label).to_string(),
                value,
            });
        } else {
            others += value;
        }
    }

    if others > 0.0 {
        slices.push(PieSlice {
            label: OTHERS_LABEL.to_string(),
            value: others,
        });
    }

    Some(slices)
}

/// Extracts the fixed five-period immigration trend for a region.
///
/// Always five entries in chronological order; absent values become 0.
/// The last period is the combined 2011-2021 column, not a sum of its
/// sub-periods. Returns `None` when every value is zero.
#[must_use]
pub fn immigration_trend(record: &RegionRecord) -> Option<Vec<TrendPoint>> {
    let points: Vec<TrendPoint> = TREND_PERIODS
        .iter()
        .map(|&(label, column)| TrendPoint {
            label,
            value: record.value(column).unwrap_or(0.0),
        })
        .collect();

    if points.iter().any(|p| p.value > 0.0) {
        Some(points)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn record(values: &[(&str, f64)]) -> RegionRecord {
        RegionRecord {
            id: "10010001".to_string(),
            province: "Ontario".to_string(),
            subdivision: "Toronto".to_string(),
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn large_shares_get_their_own_slice() {
        // China 60%, India 35%, Brazil 5%: all above the 2% cutoff.
        let r = record(&[("T1592", 60.0), ("T1599", 35.0), ("T1546", 5.0)]);
        let slices = origin_breakdown(&r).unwrap();
        assert_eq!(slices.len(), 3);
        assert!(slices.iter().all(|s| s.label != OTHERS_LABEL));
    }

    #[test]
    fn small_shares_collapse_into_others() {
        // Poland and Egypt are 1% each.
        let r = record(&[("T1592", 98.0), ("T1566", 1.0), ("T1577", 1.0)]);
        let slices = origin_breakdown(&r).unwrap();
        assert_eq!(slices.len(), 2);
        let others = slices.iter().find(|s| s.label == OTHERS_LABEL).unwrap();
        assert!((others.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn slice_values_conserve_the_positive_total() {
        let r = record(&[
            ("T1592", 500.0),
            ("T1599", 120.0),
            ("T1566", 3.0),
            ("T1577", 2.0),
            // Negative and zero values never participate.
            ("T1546", -10.0),
            ("T1550", 0.0),
        ]);
        let slices = origin_breakdown(&r).unwrap();
        let sum: f64 = slices.iter().map(|s| s.value).sum();
        assert!((sum - 625.0).abs() < 1e-9);
        assert!(slices.iter().all(|s| s.value > 0.0));
    }

    #[test]
    fn all_zero_origin_counts_are_no_data() {
        let r = record(&[("T1592", 0.0), ("T1599", 0.0)]);
        assert!(origin_breakdown(&r).is_none());
    }

    #[test]
    fn missing_origin_columns_are_no_data() {
        let r = RegionRecord {
            id: "x".to_string(),
            province: String::new(),
            subdivision: String::new(),
            values: BTreeMap::new(),
        };
        assert!(origin_breakdown(&r).is_none());
    }

    #[test]
    fn trend_always_has_five_points_in_fixed_order() {
        // Only two of the five periods are present.
        let r = record(&[("T1531", 40.0), ("T1534", 90.0)]);
        let points = immigration_trend(&r).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(
            points.iter().map(|p| p.label).collect::<Vec<_>>(),
            vec!["Before 1980", "1980-1990", "1991-2000", "2001-2010", "2011-2021"]
        );
        assert!(points[0].value.abs() < f64::EPSILON);
        assert!((points[1].value - 40.0).abs() < f64::EPSILON);
        assert!((points[4].value - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn combined_final_period_is_not_a_sum_of_sub_periods() {
        // T1535 + T1536 would be 100; the combined T1534 column says 70.
        let r = record(&[("T1534", 70.0), ("T1535", 60.0), ("T1536", 40.0)]);
        let points = immigration_trend(&r).unwrap();
        assert!((points[4].value - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_zero_trend_is_no_data() {
        let r = record(&[("T1530", 0.0), ("T1531", 0.0)]);
        assert!(immigration_trend(&r).is_none());
    }
}
