#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! ADA boundary loading for the immigration map.
//!
//! Reads the Aggregate Dissemination Area boundary file (GeoJSON,
//! WGS84), normalizes the `ADAUID` join key to a canonical string,
//! simplifies each polygon for rendering, and builds the
//! `FeatureCollection` the choropleth frontend consumes. Geometry is
//! only ever used for rendering; all filtering happens on the joined
//! tabular records.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use geo::{MultiPolygon, Simplify};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use immigration_map_catalog::JOIN_KEY_COLUMN;
use thiserror::Error;

/// Douglas-Peucker epsilon (degrees) applied before rendering. Coarse
/// enough to keep the national ADA layer responsive in the browser.
pub const SIMPLIFY_EPSILON: f64 = 0.002;

/// Errors that can occur while loading boundary data.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Boundary file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Boundary file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// Boundary data is structurally unusable.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// One ADA boundary polygon keyed by its join id.
#[derive(Debug, Clone)]
pub struct Boundary {
    /// Canonical `ADAUID` string.
    pub id: String,
    /// Region outline in WGS84 longitude/latitude.
    pub polygon: MultiPolygon<f64>,
}

/// Loads and parses the boundary file at `path`.
///
/// # Errors
///
/// Returns [`GeometryError`] if the file cannot be read, is not valid
/// `GeoJSON`, is not a feature collection, or declares a non-WGS84
/// coordinate reference system.
pub fn load_boundaries(path: &Path) -> Result<Vec<Boundary>, GeometryError> {
    let text = fs::read_to_string(path)?;
    parse_boundaries(&text)
}

/// Parses boundary features from `GeoJSON` text.
///
/// Features without a usable join key or with a non-polygonal geometry
/// are skipped with a warning; they cannot be joined or rendered.
///
/// # Errors
///
/// Returns [`GeometryError`] if the text is not a `GeoJSON` feature
/// collection in WGS84.
pub fn parse_boundaries(text: &str) -> Result<Vec<Boundary>, GeometryError> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeometryError::Conversion {
            message: "Boundary file is not a GeoJSON FeatureCollection".to_string(),
        });
    };

    check_crs(collection.foreign_members.as_ref())?;

    let mut boundaries = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Some(id) = feature_join_key(&feature) else {
            log::warn!("Skipping boundary feature without {JOIN_KEY_COLUMN} property");
            continue;
        };

        let Some(polygon) = feature
            .geometry
            .as_ref()
            .and_then(to_multi_polygon)
        else {
            log::warn!("Skipping boundary {id}: unsupported or missing geometry");
            continue;
        };

        boundaries.push(Boundary { id, polygon });
    }

    Ok(boundaries)
}

/// Simplifies every boundary in place with Douglas-Peucker.
pub fn simplify_boundaries(boundaries: &mut [Boundary], epsilon: f64) {
    for boundary in boundaries {
        boundary.polygon = boundary.polygon.simplify(epsilon);
    }
}

/// Builds the render `FeatureCollection` from the boundaries whose ids
/// survived the join, with each feature id set to its `ADAUID` (the
/// choropleth looks regions up by feature id).
#[must_use]
pub fn render_collection(boundaries: &[Boundary], keep_ids: &BTreeSet<String>) -> FeatureCollection {
    let features = boundaries
        .iter()
        .filter(|b| keep_ids.contains(&b.id))
        .map(|b| {
            let mut properties = JsonObject::new();
            properties.insert(
                JOIN_KEY_COLUMN.to_string(),
                serde_json::Value::String(b.id.clone()),
            );
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&b.polygon))),
                id: Some(Id::String(b.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Rejects boundary files that declare a legacy `crs` member naming
/// anything other than WGS84. Reprojection is out of scope; the
/// boundary file is expected to be pre-converted.
fn check_crs(foreign_members: Option<&JsonObject>) -> Result<(), GeometryError> {
    let Some(crs) = foreign_members.and_then(|m| m.get("crs")) else {
        // RFC 7946 GeoJSON carries no crs member and is WGS84.
        return Ok(());
    };

    let name = crs
        .pointer("/properties/name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("");

    if name.contains("4326") || name.contains("CRS84") {
        Ok(())
    } else {
        Err(GeometryError::Conversion {
            message: format!("Boundary file CRS is not WGS84: {name}"),
        })
    }
}

/// Extracts the join key from a feature's `ADAUID` property, falling
/// back to the feature id. Numeric keys are canonicalized to their
/// integer string form so they match the CSV side of the join.
fn feature_join_key(feature: &Feature) -> Option<String> {
    if let Some(value) = feature
        .properties
        .as_ref()
        .and_then(|p| p.get(JOIN_KEY_COLUMN))
    {
        return json_to_key(value);
    }

    match feature.id.as_ref()? {
        Id::String(s) => Some(s.clone()),
        Id::Number(n) => json_to_key(&serde_json::Value::Number(n.clone())),
    }
}

/// Canonical string form of a join key value.
fn json_to_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multi_polygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
