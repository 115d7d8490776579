#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Startup dataset loading for the immigration map.
//!
//! Loads the ADA boundary file and the statistics CSV, coerces both
//! join keys to canonical strings, inner-joins them on `ADAUID`, and
//! produces the immutable in-memory [`Dataset`] the server holds for
//! its whole lifetime. Regions present in only one source are silently
//! dropped by the join; a join that drops everything is fatal.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use immigration_map_catalog::{
    JOIN_KEY_COLUMN, PROVINCE_COLUMN, SUBDIVISION_COLUMN, is_data_column,
};
use immigration_map_dataset_models::RegionRecord;
use immigration_map_geometry::{GeometryError, SIMPLIFY_EPSILON};
use thiserror::Error;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Statistics CSV could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Statistics CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Boundary file could not be loaded.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// CSV is missing a required column.
    #[error("Missing required CSV column: {name}")]
    MissingColumn {
        /// The absent header name.
        name: String,
    },

    /// Inner join of geometry and statistics produced no rows.
    #[error("Join produced zero matching regions; check that {JOIN_KEY_COLUMN} values match")]
    EmptyJoin,
}

/// The joined, immutable dataset the server works from.
pub struct Dataset {
    /// One record per region that survived the join.
    pub records: Vec<RegionRecord>,
    /// Simplified boundaries for the surviving regions, feature id =
    /// `ADAUID`.
    pub geometry: geojson::FeatureCollection,
}

impl Dataset {
    /// Loads, joins, and simplifies both sources.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if either source cannot be read or the
    /// join yields zero rows. Callers treat this as fatal.
    pub fn load(geometry_path: &Path, csv_path: &Path) -> Result<Self, DatasetError> {
        log::info!("Reading boundary file: {}", geometry_path.display());
        let mut boundaries = immigration_map_geometry::load_boundaries(geometry_path)?;
        log::info!("Boundary file loaded: {} regions", boundaries.len());

        log::info!("Reading statistics CSV: {}", csv_path.display());
        let records = load_records(csv_path)?;
        log::info!("Statistics CSV loaded: {} rows", records.len());

        log::info!("Simplifying boundaries (epsilon {SIMPLIFY_EPSILON})...");
        immigration_map_geometry::simplify_boundaries(&mut boundaries, SIMPLIFY_EPSILON);

        // Inner join: only ids present on both sides survive.
        let boundary_ids: BTreeSet<String> = boundaries.iter().map(|b| b.id.clone()).collect();
        let records: Vec<RegionRecord> = records
            .into_iter()
            .filter(|r| boundary_ids.contains(&r.id))
            .collect();
        let joined_ids: BTreeSet<String> = records.iter().map(|r| r.id.clone()).collect();

        log::info!("Rows after join: {}", records.len());
        if records.is_empty() {
            return Err(DatasetError::EmptyJoin);
        }

        let geometry = immigration_map_geometry::render_collection(&boundaries, &joined_ids);
        drop(boundaries);

        Ok(Self { records, geometry })
    }
}

/// Loads region records from the statistics CSV at `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened or parsed, or
/// if the `ADAUID` column is missing.
pub fn load_records(path: &Path) -> Result<Vec<RegionRecord>, DatasetError> {
    read_records(File::open(path)?)
}

/// Parses region records from CSV bytes.
///
/// Every `T*`, `Transit*`, `Walking*`, and named indicator column is
/// coerced to numeric; cells that do not parse (or parse to a
/// non-finite value) are treated as absent rather than as errors.
///
/// # Errors
///
/// Returns [`DatasetError`] on malformed CSV or a missing `ADAUID`
/// header.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RegionRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let key_index =
        find_column(&headers, JOIN_KEY_COLUMN).ok_or_else(|| DatasetError::MissingColumn {
            name: JOIN_KEY_COLUMN.to_string(),
        })?;
    let province_index = find_column(&headers, PROVINCE_COLUMN);
    let subdivision_index = find_column(&headers, SUBDIVISION_COLUMN);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;

        let id = row.get(key_index).unwrap_or("").trim();
        if id.is_empty() {
            log::warn!("Skipping CSV row without {JOIN_KEY_COLUMN}");
            continue;
        }

        let mut values = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            if !is_data_column(header) {
                continue;
            }
            let Some(cell) = row.get(i) else { continue };
            if let Ok(value) = cell.trim().parse::<f64>()
                && value.is_finite()
            {
                values.insert(header.clone(), value);
            }
        }

        records.push(RegionRecord {
            id: canonical_key(id),
            province: field(&row, province_index),
            subdivision: field(&row, subdivision_index),
            values,
        });
    }

    Ok(records)
}

/// Canonical string form of a CSV join key. Keys exported as floats
/// (e.g. `10010001.0`) are normalized to their integer form so they
/// match the boundary side.
fn canonical_key(raw: &str) -> String {
    if raw.contains('.')
        && let Ok(value) = raw.parse::<f64>()
        && value.fract() == 0.0
    {
        #[allow(clippy::cast_possible_truncation)]
        return (value as i64).to_string();
    }
    raw.to_string()
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn field(row: &csv::StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .unwrap_or("")
        .trim()
        .to_string()
}
