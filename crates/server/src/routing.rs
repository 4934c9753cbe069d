//! Routing provider port.
//!
//! The service depends on [`RoutingProvider`]; production wires in
//! [`OrsRoutingProvider`], offline development and tests use
//! [`FixtureRoutingProvider`].

use async_trait::async_trait;
use finder_api_client::RoutingClient;
use finder_core::{ErrorCode, Result};
use finder_geo::{haversine_distance, polyline, Coordinate};
use finder_ranking::RouteMetric;
use finder_telemetry::{metrics, Timer};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Driving metrics, geocoding and directions.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Driving distance (km) and duration (s) from `origin` to each
    /// destination, tagged with the destination's index.
    async fn driving_metrics(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<RouteMetric>>;

    /// Best match for free text, `None` if nothing matched.
    async fn geocode(&self, text: &str) -> Result<Option<Coordinate>>;

    /// Provider route response, passed through untouched.
    async fn directions(&self, start: Coordinate, end: Coordinate) -> Result<Value>;
}

/// Provider backed by an OpenRouteService-compatible API.
#[derive(Clone)]
pub struct OrsRoutingProvider {
    client: RoutingClient,
}

impl OrsRoutingProvider {
    pub fn new(client: RoutingClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoutingProvider for OrsRoutingProvider {
    async fn driving_metrics(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<RouteMetric>> {
        let _timer = Timer::start("upstream.matrix_ms");
        self.client
            .matrix()
            .driving_metrics(origin, destinations)
            .await
            .map_err(|e| {
                metrics().increment("upstream.matrix.errors");
                e.into_upstream(ErrorCode::RoutingServiceError)
            })
    }

    async fn geocode(&self, text: &str) -> Result<Option<Coordinate>> {
        let _timer = Timer::start("upstream.geocode_ms");
        self.client.geocode().search(text).await.map_err(|e| {
            metrics().increment("upstream.geocode.errors");
            e.into_upstream(ErrorCode::GeocodeServiceError)
        })
    }

    async fn directions(&self, start: Coordinate, end: Coordinate) -> Result<Value> {
        let _timer = Timer::start("upstream.directions_ms");
        self.client.directions().route(start, end).await.map_err(|e| {
            metrics().increment("upstream.directions.errors");
            e.into_upstream(ErrorCode::DirectionsServiceError)
        })
    }
}

/// Offline provider.
///
/// Distances are great-circle distances scaled by a detour factor, times
/// assume a constant speed, and geocoding answers from a fixed place list.
/// Destinations listed in `unroutable` get `null` metrics.
#[derive(Debug, Clone)]
pub struct FixtureRoutingProvider {
    places: HashMap<String, Coordinate>,
    unroutable: Vec<Coordinate>,
    detour_factor: f64,
    speed_kmh: f64,
    precision: u32,
}

impl Default for FixtureRoutingProvider {
    fn default() -> Self {
        Self {
            places: HashMap::new(),
            unroutable: Vec::new(),
            detour_factor: 1.3,
            speed_kmh: 40.0,
            precision: polyline::DEFAULT_PRECISION,
        }
    }
}

impl FixtureRoutingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer geocode searches for `name` (case-insensitive)
    #[must_use]
    pub fn with_place(mut self, name: &str, at: Coordinate) -> Self {
        self.places.insert(name.trim().to_lowercase(), at);
        self
    }

    /// Report `at` as unreachable by road
    #[must_use]
    pub fn with_unroutable(mut self, at: Coordinate) -> Self {
        self.unroutable.push(at);
        self
    }

    /// Precision used when encoding route geometry
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    fn road_km(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        haversine_distance(from, to) * self.detour_factor
    }
}

#[async_trait]
impl RoutingProvider for FixtureRoutingProvider {
    async fn driving_metrics(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<RouteMetric>> {
        Ok(destinations
            .iter()
            .enumerate()
            .map(|(destination, to)| {
                if self.unroutable.contains(to) {
                    return RouteMetric {
                        destination,
                        distance_km: None,
                        duration_secs: None,
                    };
                }
                let km = self.road_km(&origin, to);
                RouteMetric {
                    destination,
                    distance_km: Some(km),
                    duration_secs: Some(km / self.speed_kmh * 3600.0),
                }
            })
            .collect())
    }

    async fn geocode(&self, text: &str) -> Result<Option<Coordinate>> {
        Ok(self.places.get(&text.trim().to_lowercase()).copied())
    }

    async fn directions(&self, start: Coordinate, end: Coordinate) -> Result<Value> {
        let geometry = polyline::encode(&[start, end], self.precision).map_err(|e| {
            finder_core::Error::upstream(ErrorCode::DirectionsServiceError, "Fixture route failed")
                .with_source(e)
        })?;
        let km = self.road_km(&start, &end);

        Ok(json!({
            "routes": [{
                "summary": {
                    "distance": km * 1000.0,
                    "duration": km / self.speed_kmh * 3600.0
                },
                "geometry": geometry
            }],
            "metadata": {
                "query": {"coordinates": [start.lon_lat(), end.lon_lat()]}
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_api_client::route_geometry;

    #[tokio::test]
    async fn test_fixture_metrics_keep_destination_index() {
        let provider = FixtureRoutingProvider::new().with_unroutable(Coordinate::new(13.9, 100.6));
        let origin = Coordinate::new(13.75, 100.5);
        let destinations = [
            Coordinate::new(13.76, 100.5),
            Coordinate::new(13.9, 100.6),
            Coordinate::new(13.80, 100.5),
        ];

        let metrics = provider.driving_metrics(origin, &destinations).await.unwrap();
        assert_eq!(metrics.iter().map(|m| m.destination).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(metrics[0].distance_km.unwrap() < metrics[2].distance_km.unwrap());
        assert_eq!(metrics[1].distance_km, None);
    }

    #[tokio::test]
    async fn test_fixture_geocode() {
        let provider = FixtureRoutingProvider::new()
            .with_place("Victory Monument", Coordinate::new(13.7649, 100.5383));
        assert_eq!(
            provider.geocode("  victory monument ").await.unwrap(),
            Some(Coordinate::new(13.7649, 100.5383))
        );
        assert_eq!(provider.geocode("Atlantis").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fixture_directions_geometry_decodes() {
        let provider = FixtureRoutingProvider::new();
        let start = Coordinate::new(13.75, 100.5);
        let end = Coordinate::new(13.8, 100.55);

        let response = provider.directions(start, end).await.unwrap();
        let geometry = route_geometry(&response).unwrap();
        let points = polyline::decode(geometry, polyline::DEFAULT_PRECISION).unwrap();
        assert_eq!(points, vec![start, end]);
    }
}
