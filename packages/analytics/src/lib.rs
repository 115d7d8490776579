#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The business logic of the immigration map: turning the current
//! dropdown selections into one data column, filtering the joined
//! records by a quantile cutoff, and producing the per-region
//! drill-down series for the detail panel.
//!
//! Everything here is pure computation over in-memory records; the
//! server owns the cache-replacement and HTTP concerns.

pub mod detail;
pub mod filter;
pub mod resolve;

pub use detail::{OTHERS_LABEL, PieSlice, TrendPoint, immigration_trend, origin_breakdown};
pub use filter::{FilteredRow, FilteredSet, filter_regions};
pub use resolve::{ResolvedColumn, resolve_column};
