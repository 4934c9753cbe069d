//! HTTP routes.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/api/facilities?type=&lat=&lon=` | [`nearest_facilities`] |
//! | GET | `/api/facility/:id` | [`facility_detail`] |
//! | GET | `/api/geocode?text=` | [`geocode`] |
//! | POST | `/api/directions` | [`directions`] |
//! | GET | `/health` | [`health`] |
//! | GET | `/metrics` | [`metrics_snapshot`] |
//!
//! Parameters are taken as raw strings and checked with
//! [`Validator`], so missing or malformed input is always a 400.

use crate::error::AppResult;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use finder_api_client::request_id;
use finder_core::validation::{require_number, Validator};
use finder_core::Error;
use finder_geo::Coordinate;
use finder_ranking::{FacilityDetail, FacilityType, RankedFacility};
use finder_telemetry::{metrics, Timer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600));

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    });

    Router::new()
        .route("/api/facilities", get(nearest_facilities))
        .route("/api/facility/:id", get(facility_detail))
        .route("/api/geocode", get(geocode))
        .route("/api/directions", post(directions))
        .route("/health", get(health))
        .route("/metrics", get(metrics_snapshot))
        .layer(middleware::from_fn(track_requests))
        .layer(trace)
        .layer(middleware::from_fn(assign_request_id))
        .layer(cors)
        .with_state(state)
}

/// Keep the caller's `X-Request-ID` or mint one, echo it on the response, and
/// make it the id of every provider call the handler makes.
async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = request_id::scope(request_id, next.run(request)).await;
    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn track_requests(request: Request, next: Next) -> Response {
    let timer = Timer::start("http.latency_ms");
    metrics().increment("http.requests");

    let response = next.run(request).await;

    let class = match response.status().as_u16() {
        200..=299 => "http.responses.2xx",
        400..=499 => "http.responses.4xx",
        500..=599 => "http.responses.5xx",
        _ => "http.responses.other",
    };
    metrics().increment(class);
    timer.stop();
    response
}

// -----------------------------------------------------------------------------
// Facilities
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    #[serde(rename = "type")]
    facility_type: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
}

/// `GET /api/facilities`
pub async fn nearest_facilities(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> AppResult<Json<Vec<RankedFacility>>> {
    Validator::new()
        .required("type", query.facility_type.as_deref())
        .one_of("type", query.facility_type.as_deref(), &FacilityType::names())
        .latitude("lat", query.lat.as_deref())
        .longitude("lon", query.lon.as_deref())
        .validate()
        .to_result()?;

    let facility_type: FacilityType = query
        .facility_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(Error::validation)?;
    let origin = Coordinate::new(
        require_number("lat", query.lat.as_deref())?,
        require_number("lon", query.lon.as_deref())?,
    );

    let ranked = state.service.find_nearest(facility_type, origin).await?;
    Ok(Json(ranked))
}

/// `GET /api/facility/:id`
pub async fn facility_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FacilityDetail>> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| Error::validation(format!("Facility id must be an integer, got '{id}'")))?;

    let detail = state.service.facility_detail(id).await?;
    Ok(Json(detail))
}

// -----------------------------------------------------------------------------
// Geocoding and directions
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    text: Option<String>,
}

/// Geocode response body
#[derive(Debug, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// `GET /api/geocode`
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<LatLon>> {
    let text = query.text.as_deref().map(str::trim);
    Validator::new().required("text", text).validate().to_result()?;

    let found = state.service.geocode(text.unwrap_or_default()).await?;
    Ok(Json(LatLon {
        lat: found.latitude,
        lon: found.longitude,
    }))
}

/// Directions request body.
///
/// Fields are raw JSON so that missing, null and non-numeric values are all
/// reported as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    start_lat: Option<Value>,
    start_lon: Option<Value>,
    end_lat: Option<Value>,
    end_lon: Option<Value>,
}

fn raw_number(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `POST /api/directions`
pub async fn directions(State(state): State<AppState>, body: Bytes) -> AppResult<Json<Value>> {
    let request: DirectionsRequest = if body.iter().all(u8::is_ascii_whitespace) {
        DirectionsRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| Error::validation(format!("Request body must be a JSON object: {e}")))?
    };

    let start_lat = raw_number(request.start_lat.as_ref());
    let start_lon = raw_number(request.start_lon.as_ref());
    let end_lat = raw_number(request.end_lat.as_ref());
    let end_lon = raw_number(request.end_lon.as_ref());

    Validator::new()
        .latitude("startLat", start_lat.as_deref())
        .longitude("startLon", start_lon.as_deref())
        .latitude("endLat", end_lat.as_deref())
        .longitude("endLon", end_lon.as_deref())
        .validate()
        .to_result()?;

    let start = Coordinate::new(
        require_number("startLat", start_lat.as_deref())?,
        require_number("startLon", start_lon.as_deref())?,
    );
    let end = Coordinate::new(
        require_number("endLat", end_lat.as_deref())?,
        require_number("endLon", end_lon.as_deref())?,
    );

    let route = state.service.directions(start, end).await?;
    Ok(Json(route))
}

// -----------------------------------------------------------------------------
// Operations
// -----------------------------------------------------------------------------

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = state.service.store_healthy().await;
    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_up { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "database": if database_up { "up" } else { "down" },
        })),
    )
}

/// `GET /metrics`
pub async fn metrics_snapshot(State(state): State<AppState>) -> Json<Value> {
    state.service.record_pool_gauges();
    Json(metrics().export_json())
}
