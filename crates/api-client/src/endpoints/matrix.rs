//! Distance/duration matrix endpoint
//!
//! The requester is sent as location 0 and candidate `i` as location
//! `i + 1`. Results come back as a single row with one cell per
//! destination, and each cell is tagged with the candidate index it
//! belongs to.

use crate::client::RoutingClient;
use crate::error::{ApiError, ApiResult};
use finder_geo::Coordinate;
use finder_ranking::RouteMetric;
use serde::{Deserialize, Serialize};

/// Matrix API interface
#[derive(Clone)]
pub struct MatrixApi {
    client: RoutingClient,
}

impl MatrixApi {
    /// Create a new matrix API interface
    pub(crate) fn new(client: RoutingClient) -> Self {
        Self { client }
    }

    /// Driving distance (km) and duration (s) from `origin` to each destination.
    ///
    /// The returned metrics are indexed by position in `destinations`. No
    /// request is made when `destinations` is empty.
    pub async fn driving_metrics(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> ApiResult<Vec<RouteMetric>> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let request = MatrixRequest::one_to_many(origin, destinations)?;
        let path = format!("v2/matrix/{}", self.client.config().profile);
        let response: MatrixResponse = self.client.post(&path, &request).await?;

        response.into_metrics(destinations.len())
    }
}

/// Matrix request body
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRequest {
    /// All locations as `[lon, lat]`
    pub locations: Vec<[f64; 2]>,
    /// Indices into `locations` used as sources
    pub sources: Vec<usize>,
    /// Indices into `locations` used as destinations
    pub destinations: Vec<usize>,
    /// Requested metrics
    pub metrics: Vec<&'static str>,
    /// Distance unit
    pub units: &'static str,
}

impl MatrixRequest {
    /// Build a one-source request
    pub fn one_to_many(origin: Coordinate, destinations: &[Coordinate]) -> ApiResult<Self> {
        let mut locations = Vec::with_capacity(destinations.len() + 1);
        for (index, coordinate) in std::iter::once(&origin).chain(destinations).enumerate() {
            if !coordinate.is_valid() {
                return Err(ApiError::InvalidCoordinate(format!(
                    "location {index} ({}, {}) is out of range",
                    coordinate.latitude, coordinate.longitude
                )));
            }
            locations.push(coordinate.lon_lat());
        }

        Ok(Self {
            locations,
            sources: vec![0],
            destinations: (1..=destinations.len()).collect(),
            metrics: vec!["distance", "duration"],
            units: "km",
        })
    }
}

/// Matrix response body
///
/// Unreachable pairs come back as `null` cells.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixResponse {
    /// Distances in the requested unit, one row per source
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,
    /// Durations in seconds, one row per source
    #[serde(default)]
    pub durations: Option<Vec<Vec<Option<f64>>>>,
}

impl MatrixResponse {
    /// Flatten the single source row into per-destination metrics
    pub fn into_metrics(self, expected: usize) -> ApiResult<Vec<RouteMetric>> {
        let distances = first_row(self.distances, "distances", expected)?;
        let durations = first_row(self.durations, "durations", expected)?;

        Ok(distances
            .into_iter()
            .zip(durations)
            .enumerate()
            .map(|(destination, (distance_km, duration_secs))| RouteMetric {
                destination,
                distance_km,
                duration_secs,
            })
            .collect())
    }
}

fn first_row(
    rows: Option<Vec<Vec<Option<f64>>>>,
    name: &str,
    expected: usize,
) -> ApiResult<Vec<Option<f64>>> {
    let row = rows
        .and_then(|rows| rows.into_iter().next())
        .ok_or_else(|| ApiError::invalid_response(format!("matrix response has no {name}")))?;

    if row.len() != expected {
        return Err(ApiError::invalid_response(format!(
            "matrix {name} row has {} cells, expected {expected}",
            row.len()
        )));
    }
    Ok(row)
}
