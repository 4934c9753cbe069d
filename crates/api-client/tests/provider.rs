//! Client calls against a local stand-in provider.

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use finder_api_client::{request_id, route_geometry, ApiError, ClientConfig, RoutingClient};
use finder_core::config::GeocodeScope;
use finder_geo::Coordinate;
use serde_json::{json, Value};
use std::collections::HashMap;

const API_KEY: &str = "test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(API_KEY)
        && headers.contains_key("x-request-id")
}

async fn matrix(headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let destinations = body["destinations"].as_array().ok_or(StatusCode::BAD_REQUEST)?;
    // Last destination is unreachable; the rest are 1.5 km and 120 s apart.
    let cells = destinations.len();
    let cell = |i: usize, unit: f64| {
        if i + 1 == cells && cells > 1 {
            Value::Null
        } else {
            json!(unit * (i + 1) as f64)
        }
    };
    let distances: Vec<Value> = (0..cells).map(|i| cell(i, 1.5)).collect();
    let durations: Vec<Value> = (0..cells).map(|i| cell(i, 120.0)).collect();
    Ok(Json(json!({"distances": [distances], "durations": [durations]})))
}

async fn geocode(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let text = params.get("text").map(String::as_str).unwrap_or_default();
    let in_scope = params.get("boundary.country").is_none_or(|c| c == "TH");
    if text == "nowhere" || !in_scope {
        return Json(json!({"type": "FeatureCollection", "features": []}));
    }
    if text == "off the map" {
        return Json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [200.0, 13.7]}
            }]
        }));
    }
    Json(json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [100.5347, 13.7462]}
        }]
    }))
}

async fn directions(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let request_id = headers.get("x-request-id").and_then(|v| v.to_str().ok());
    json!({
        "routes": [{"summary": {"distance": 7432.1}, "geometry": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"}],
        "metadata": {"query": body, "request_id": request_id}
    })
    .into()
}

async fn spawn_provider() -> String {
    let app = Router::new()
        .route("/v2/matrix/driving-car", post(matrix))
        .route("/geocode/search", get(geocode))
        .route("/v2/directions/driving-car", post(directions));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> RoutingClient {
    let config = ClientConfig::default().with_base_url(base_url).with_api_key(API_KEY);
    RoutingClient::with_config(config).unwrap()
}

#[tokio::test]
async fn test_matrix_metrics_are_indexed_by_destination() {
    let base = spawn_provider().await;
    let origin = Coordinate::new(13.7563, 100.5018);
    let destinations = [
        Coordinate::new(13.75, 100.49),
        Coordinate::new(13.73, 100.53),
        Coordinate::new(13.80, 100.55),
    ];

    let metrics = client(&base).matrix().driving_metrics(origin, &destinations).await.unwrap();

    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics[0].destination, 0);
    assert_eq!(metrics[0].distance_km, Some(1.5));
    assert_eq!(metrics[1].duration_secs, Some(240.0));
    assert_eq!(metrics[2].distance_km, None);
}

#[tokio::test]
async fn test_matrix_without_destinations_skips_request() {
    // Unroutable base URL: any request would fail.
    let metrics = client("http://127.0.0.1:9")
        .matrix()
        .driving_metrics(Coordinate::new(0.0, 0.0), &[])
        .await
        .unwrap();
    assert!(metrics.is_empty());
}

#[tokio::test]
async fn test_missing_api_key_is_rejected_by_provider() {
    let base = spawn_provider().await;
    let client = RoutingClient::with_config(ClientConfig::default().with_base_url(&base)).unwrap();

    let err = client
        .matrix()
        .driving_metrics(Coordinate::new(0.0, 0.0), &[Coordinate::new(0.1, 0.1)])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ApiResponse { status: 401, .. }));
}

#[tokio::test]
async fn test_geocode_first_match_and_no_match() {
    let base = spawn_provider().await;
    let client = client(&base);

    let found = client.geocode().search("Siam Paragon").await.unwrap();
    assert_eq!(found, Some(Coordinate::new(13.7462, 100.5347)));

    let missing = client.geocode().search("nowhere").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_geocode_unusable_point_is_upstream_error() {
    let base = spawn_provider().await;
    let err = client(&base).geocode().search("off the map").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));

    let upstream = err.into_upstream(finder_core::ErrorCode::GeocodeServiceError);
    assert_eq!(upstream.http_status(), 500);
}

#[tokio::test]
async fn test_geocode_scope_is_sent() {
    let base = spawn_provider().await;
    let scoped = RoutingClient::with_config(
        ClientConfig::default()
            .with_base_url(&base)
            .with_api_key(API_KEY)
            .with_geocode_scope(GeocodeScope::Regional {
                country: Some("LA".to_string()),
                bbox: None,
            }),
    )
    .unwrap();

    assert_eq!(scoped.geocode().search("Siam Paragon").await.unwrap(), None);
}

#[tokio::test]
async fn test_directions_passthrough() {
    let base = spawn_provider().await;
    let response = client(&base)
        .directions()
        .route(Coordinate::new(13.75, 100.5), Coordinate::new(13.8, 100.55))
        .await
        .unwrap();

    assert_eq!(route_geometry(&response), Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@"));
    assert_eq!(
        response["metadata"]["query"]["coordinates"],
        json!([[100.5, 13.75], [100.55, 13.8]])
    );
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let base = spawn_provider().await;
    let client = client(&base);
    let (start, end) = (Coordinate::new(13.75, 100.5), Coordinate::new(13.8, 100.55));

    let scoped = request_id::scope("inbound-7".to_string(), client.directions().route(start, end))
        .await
        .unwrap();
    assert_eq!(scoped["metadata"]["request_id"], "inbound-7");

    let unscoped = client.directions().route(start, end).await.unwrap();
    let minted = unscoped["metadata"]["request_id"].as_str().unwrap();
    assert_ne!(minted, "inbound-7");
    assert!(uuid::Uuid::parse_str(minted).is_ok());
}

#[tokio::test]
async fn test_unreachable_provider_is_request_error() {
    let err = client("http://127.0.0.1:9")
        .directions()
        .route(Coordinate::new(13.75, 100.5), Coordinate::new(13.8, 100.55))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}
