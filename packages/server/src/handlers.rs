//! HTTP handler functions for the immigration map API.

use actix_web::{HttpResponse, web};
use immigration_map_analytics as analytics;
use immigration_map_catalog::{
    ACCESSIBILITY_MODES, ALL_IMMIGRANTS_COLUMN, DataType, ORIGIN_COUNTRIES, ORIGIN_REGIONS,
    OTHER_INDICATORS, QUANTILE_OPTIONS, TIME_PERIODS,
};
use immigration_map_dataset_models::Selection;
use immigration_map_server_models::{
    ApiHealth, ApiPieSlice, ApiTrendPoint, CatalogOption, CatalogResponse, MapPoint,
    MapQueryParams, MapResponse, QuantileOption, RegionDetailResponse, RegionSummary,
};
use std::sync::Arc;
use strum::IntoEnumIterator as _;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/catalog`
///
/// Returns the dropdown option tables the frontend populates its
/// controls from.
pub async fn catalog() -> HttpResponse {
    let options = |group: &[(&str, &str)]| group.iter().map(CatalogOption::from).collect();

    HttpResponse::Ok().json(CatalogResponse {
        periods: options(TIME_PERIODS),
        regions: options(ORIGIN_REGIONS),
        countries: options(ORIGIN_COUNTRIES),
        accessibility_modes: options(ACCESSIBILITY_MODES),
        other_indicators: options(OTHER_INDICATORS),
        data_types: DataType::iter().map(|d| d.to_string()).collect(),
        quantiles: QUANTILE_OPTIONS
            .iter()
            .map(|&(label, value)| QuantileOption {
                label: label.to_string(),
                value,
            })
            .collect(),
    })
}

/// `GET /api/geometry`
///
/// Returns the simplified render `FeatureCollection`, serialized once
/// at startup.
pub async fn geometry(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(state.geometry_json.clone())
}

/// `GET /api/map`
///
/// Resolves the selection to one data column, recomputes the filtered
/// set, replaces the click cache with it, and returns the choropleth
/// payload. Failures never crash the interaction: they come back as a
/// placeholder payload with an `Error:` title.
pub async fn map(state: web::Data<AppState>, params: web::Query<MapQueryParams>) -> HttpResponse {
    let selection = selection_from_params(&params);

    let response = recompute_map(&state, &selection).unwrap_or_else(|message| {
        log::error!("Map recomputation failed: {message}");
        MapResponse::placeholder(format!("Error: {message}"))
    });

    HttpResponse::Ok().json(response)
}

/// Recomputes the filtered set for `selection` and swaps it into the
/// cache. An empty result clears the cache and yields the "no data"
/// placeholder.
fn recompute_map(state: &AppState, selection: &Selection) -> Result<MapResponse, String> {
    let mut cache = state
        .cache
        .write()
        .map_err(|_| "filter cache lock poisoned".to_string())?;

    let Some(set) = analytics::filter_regions(&state.dataset.records, selection) else {
        *cache = None;
        return Ok(MapResponse::placeholder("No Data Available"));
    };

    let set = Arc::new(set);
    *cache = Some(Arc::clone(&set));

    Ok(MapResponse {
        title: set.title.clone(),
        column: Some(set.column.clone()),
        zmax: Some(set.zmax),
        points: set.rows().iter().map(MapPoint::from).collect(),
    })
}

/// `GET /api/region/{id}`
///
/// Builds the detail panel for a clicked region from the cached
/// filtered set. A missing cache or unknown id yields guidance text
/// rather than an error; the pie and trend panels carry their own
/// no-data messages.
pub async fn region_detail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();

    let cached = match state.cache.read() {
        Ok(cache) => cache.clone(),
        Err(_) => {
            log::error!("Filter cache lock poisoned");
            None
        }
    };

    let Some(set) = cached else {
        return HttpResponse::Ok().json(RegionDetailResponse::guidance());
    };
    let Some(row) = set.get(&id) else {
        return HttpResponse::Ok().json(RegionDetailResponse::guidance());
    };

    let (pie, pie_message) = match analytics::origin_breakdown(&row.record) {
        Some(slices) => (
            Some(slices.into_iter().map(ApiPieSlice::from).collect()),
            None,
        ),
        None => (
            None,
            Some("No detailed country of origin data available for this region.".to_string()),
        ),
    };

    let (trend, trend_message) = match analytics::immigration_trend(&row.record) {
        Some(points) => (
            Some(points.into_iter().map(ApiTrendPoint::from).collect()),
            None,
        ),
        None => (
            None,
            Some("No time trend data available for this region.".to_string()),
        ),
    };

    HttpResponse::Ok().json(RegionDetailResponse {
        message: None,
        summary: Some(RegionSummary::from(row)),
        pie,
        pie_message,
        trend,
        trend_message,
    })
}

/// Builds a [`Selection`] from the map query parameters, falling back
/// to the initial UI state for absent ones. Cleared (empty-string)
/// optional dropdowns count as unselected, and the quantile is clamped
/// to the supported range.
fn selection_from_params(params: &MapQueryParams) -> Selection {
    let required = |value: &Option<String>, default: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    let optional = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    };

    Selection {
        period: required(&params.period, ALL_IMMIGRANTS_COLUMN),
        region: required(&params.region, ALL_IMMIGRANTS_COLUMN),
        country: optional(&params.country),
        accessibility: optional(&params.accessibility),
        quantile: params.quantile.unwrap_or(0.0).clamp(0.0, 0.99),
        data_type: params
            .data_type
            .as_deref()
            .and_then(|label| label.trim().parse().ok())
            .unwrap_or_default(),
        indicator: optional(&params.indicator),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use actix_web::body::to_bytes;
    use geojson::FeatureCollection;
    use immigration_map_dataset::Dataset;
    use immigration_map_dataset_models::RegionRecord;

    use super::*;

    fn record(id: &str, values: &[(&str, f64)]) -> RegionRecord {
        RegionRecord {
            id: id.to_string(),
            province: "Ontario".to_string(),
            subdivision: "Toronto".to_string(),
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect(),
        }
    }

    fn test_state(records: Vec<RegionRecord>) -> web::Data<AppState> {
        let dataset = Dataset {
            records,
            geometry: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
        };
        web::Data::new(AppState::new(dataset).unwrap())
    }

    async fn json_body(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn empty_params_yield_the_initial_selection() {
        let selection = selection_from_params(&MapQueryParams::default());
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn cleared_dropdowns_count_as_unselected() {
        let params = MapQueryParams {
            country: Some(String::new()),
            accessibility: Some("  ".to_string()),
            ..MapQueryParams::default()
        };
        let selection = selection_from_params(&params);
        assert_eq!(selection.country, None);
        assert_eq!(selection.accessibility, None);
    }

    #[test]
    fn quantile_is_clamped_to_the_supported_range() {
        let params = MapQueryParams {
            quantile: Some(1.5),
            ..MapQueryParams::default()
        };
        assert!((selection_from_params(&params).quantile - 0.99).abs() < 1e-12);
    }

    #[test]
    fn unknown_data_type_label_falls_back_to_immigrant_number() {
        let params = MapQueryParams {
            data_type: Some("Bananas".to_string()),
            ..MapQueryParams::default()
        };
        assert_eq!(
            selection_from_params(&params).data_type,
            DataType::ImmigrantNumber
        );
    }

    #[actix_web::test]
    async fn map_replaces_the_cache_and_returns_points() {
        let state = test_state(vec![
            record("1", &[("T1529", 100.0)]),
            record("2", &[("T1529", 300.0)]),
        ]);

        let response = map(state.clone(), web::Query(MapQueryParams::default())).await;
        let body = json_body(response).await;

        assert_eq!(body["title"], "Immigration by T1529");
        assert_eq!(body["points"].as_array().unwrap().len(), 2);
        assert!(state.cache.read().unwrap().is_some());
    }

    #[actix_web::test]
    async fn unmatched_filter_returns_the_no_data_placeholder() {
        let state = test_state(vec![record("1", &[("T1529", 100.0)])]);

        let params = MapQueryParams {
            country: Some("T1592".to_string()),
            ..MapQueryParams::default()
        };
        let body = json_body(map(state.clone(), web::Query(params)).await).await;

        assert_eq!(body["title"], "No Data Available");
        assert!(body["points"].as_array().unwrap().is_empty());
        assert!(state.cache.read().unwrap().is_none());
    }

    #[actix_web::test]
    async fn click_before_any_map_render_returns_guidance() {
        let state = test_state(vec![record("1", &[("T1529", 100.0)])]);

        let body = json_body(region_detail(state, web::Path::from("1".to_string())).await).await;
        assert_eq!(body["message"], "Click on a region to see details.");
    }

    #[actix_web::test]
    async fn click_on_a_filtered_region_returns_detail_panels() {
        let state = test_state(vec![record(
            "1",
            &[
                ("T1529", 100.0),
                ("T1530", 10.0),
                ("T1534", 40.0),
                ("T1592", 80.0),
                ("T1599", 20.0),
                ("Average Quintile", 4.0),
                ("Average Score", 3.2),
            ],
        )]);

        let _ = map(state.clone(), web::Query(MapQueryParams::default())).await;
        let body = json_body(region_detail(state, web::Path::from("1".to_string())).await).await;

        assert_eq!(body["summary"]["id"], "1");
        assert_eq!(body["summary"]["totalImmigrants"], 100.0);
        assert_eq!(body["pie"].as_array().unwrap().len(), 2);
        assert_eq!(body["trend"].as_array().unwrap().len(), 5);
        assert!(body.get("pieMessage").is_none());
    }

    #[actix_web::test]
    async fn click_with_all_zero_origins_reports_pie_no_data() {
        let state = test_state(vec![record(
            "1",
            &[("T1529", 100.0), ("T1592", 0.0), ("T1530", 5.0)],
        )]);

        let _ = map(state.clone(), web::Query(MapQueryParams::default())).await;
        let body = json_body(region_detail(state, web::Path::from("1".to_string())).await).await;

        assert_eq!(
            body["pieMessage"],
            "No detailed country of origin data available for this region."
        );
        assert!(body.get("pie").is_none());
        assert_eq!(body["trend"].as_array().unwrap().len(), 5);
    }
}
