//! Directions endpoint

use crate::client::RoutingClient;
use crate::error::{ApiError, ApiResult};
use finder_geo::Coordinate;
use serde::Serialize;
use serde_json::Value;

/// Directions API interface
#[derive(Clone)]
pub struct DirectionsApi {
    client: RoutingClient,
}

impl DirectionsApi {
    /// Create a new directions API interface
    pub(crate) fn new(client: RoutingClient) -> Self {
        Self { client }
    }

    /// Route from `start` to `end`.
    ///
    /// The provider response is returned untouched.
    ///
    /// POST /v2/directions/{profile}
    pub async fn route(&self, start: Coordinate, end: Coordinate) -> ApiResult<Value> {
        let request = DirectionsRequest::between(start, end)?;
        let path = format!("v2/directions/{}", self.client.config().profile);
        self.client.post(&path, &request).await
    }
}

/// Directions request body
#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRequest {
    /// Waypoints as `[lon, lat]`
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsRequest {
    /// Two-waypoint request
    pub fn between(start: Coordinate, end: Coordinate) -> ApiResult<Self> {
        for (name, coordinate) in [("start", start), ("end", end)] {
            if !coordinate.is_valid() {
                return Err(ApiError::InvalidCoordinate(format!(
                    "{name} ({}, {}) is out of range",
                    coordinate.latitude, coordinate.longitude
                )));
            }
        }
        Ok(Self {
            coordinates: vec![start.lon_lat(), end.lon_lat()],
        })
    }
}

/// Encoded geometry of the first route, if the response carries one
pub fn route_geometry(response: &Value) -> Option<&str> {
    response
        .get("routes")?
        .get(0)?
        .get("geometry")?
        .as_str()
}
