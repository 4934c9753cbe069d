//! Request pipelines behind the HTTP handlers.
//!
//! Nearest-facility search runs in three stages:
//!
//! 1. **Prefilter**: the store returns up to [`MAX_CANDIDATES`] facilities of
//!    the requested type, nearest first by geodesic distance.
//! 2. **Enrich**: one matrix call gives driving distance and time for every
//!    candidate; results are joined on destination index.
//! 3. **Rank**: status priority, then driving distance; the top
//!    [`MAX_RESULTS`] are returned.
//!
//! [`MAX_RESULTS`]: finder_ranking::MAX_RESULTS

use crate::routing::RoutingProvider;
use crate::store::FacilityStore;
use finder_api_client::route_geometry;
use finder_core::{Error, ErrorCode, Result};
use finder_geo::{polyline, Coordinate};
use finder_ranking::{
    check_candidate_count, enrich, top_results, Facility, FacilityDetail, FacilityType,
    RankedFacility, RankingError, MAX_CANDIDATES,
};
use finder_telemetry::metrics;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Facility search, detail, geocoding and directions.
#[derive(Clone)]
pub struct FacilityService {
    store: Arc<dyn FacilityStore>,
    routing: Arc<dyn RoutingProvider>,
    polyline_precision: u32,
}

impl FacilityService {
    pub fn new(store: Arc<dyn FacilityStore>, routing: Arc<dyn RoutingProvider>) -> Self {
        Self {
            store,
            routing,
            polyline_precision: polyline::DEFAULT_PRECISION,
        }
    }

    /// Precision of route geometries returned by the directions provider
    #[must_use]
    pub fn with_polyline_precision(mut self, precision: u32) -> Self {
        self.polyline_precision = precision;
        self
    }

    /// Up to three facilities of `facility_type`, best first.
    #[instrument(skip(self))]
    pub async fn find_nearest(
        &self,
        facility_type: FacilityType,
        origin: Coordinate,
    ) -> Result<Vec<RankedFacility>> {
        let candidates = self
            .store
            .nearest_by_type(facility_type, origin, MAX_CANDIDATES)
            .await?;
        check_candidate_count(candidates.len()).map_err(matrix_error)?;

        if candidates.is_empty() {
            debug!("No candidates; skipping matrix call");
            return Ok(Vec::new());
        }

        let destinations: Vec<Coordinate> = candidates.iter().map(Facility::coordinate).collect();
        let metrics = self.routing.driving_metrics(origin, &destinations).await?;
        let enriched = enrich(candidates, metrics).map_err(matrix_error)?;

        let ranked = top_results(enriched);
        debug!(
            results = ranked.len(),
            best = ranked.first().map(|r| r.facility.id),
            "Ranked facilities"
        );
        Ok(ranked)
    }

    /// Facility with its reviews and average rating.
    #[instrument(skip(self))]
    pub async fn facility_detail(&self, id: i64) -> Result<FacilityDetail> {
        let facility = self
            .store
            .facility(id)
            .await?
            .ok_or_else(|| Error::facility_not_found(id))?;
        let reviews = self.store.reviews(id).await?;
        Ok(FacilityDetail::new(facility, reviews))
    }

    /// Coordinates of the best match for `text`.
    #[instrument(skip(self))]
    pub async fn geocode(&self, text: &str) -> Result<Coordinate> {
        self.routing
            .geocode(text)
            .await?
            .ok_or_else(|| Error::no_geocode_match(text))
    }

    /// Provider route between two points, passed through.
    #[instrument(skip(self))]
    pub async fn directions(&self, start: Coordinate, end: Coordinate) -> Result<Value> {
        let response = self.routing.directions(start, end).await?;

        match route_geometry(&response).map(|g| polyline::decode(g, self.polyline_precision)) {
            Some(Ok(points)) => debug!(points = points.len(), "Route geometry decoded"),
            Some(Err(e)) => {
                metrics().increment("directions.undecodable_geometry");
                warn!(
                    error = %e,
                    precision = self.polyline_precision,
                    "Route geometry does not decode"
                );
            }
            None => debug!("Route response carries no encoded geometry"),
        }

        Ok(response)
    }

    /// Publish store pool occupancy as gauges.
    pub fn record_pool_gauges(&self) {
        if let Some(stats) = self.store.pool_stats() {
            metrics().gauge("db.pool.size", u64::from(stats.size));
            metrics().gauge("db.pool.idle", u64::try_from(stats.idle).unwrap_or(u64::MAX));
        }
    }

    /// Whether the store answers
    pub async fn store_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Facility store ping failed");
                false
            }
        }
    }
}

fn matrix_error(err: RankingError) -> Error {
    Error::upstream(ErrorCode::RoutingServiceError, "Matrix response unusable").with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::FixtureRoutingProvider;
    use crate::store::MemoryFacilityStore;
    use finder_ranking::FacilityStatus;
    use serde_json::json;

    fn facility(id: i64, lat: f64, status: &str) -> Value {
        json!({
            "id": id, "name": format!("Hospital {id}"), "address": "", "type": "hospital",
            "lat": lat, "lon": 100.5, "status": status, "rating": 3.0,
            "phone": null, "messaging": null
        })
    }

    fn store(facilities: Vec<Value>, reviews: Value) -> Arc<MemoryFacilityStore> {
        let fixtures = json!({"facilities": facilities, "reviews": reviews});
        Arc::new(MemoryFacilityStore::from_json(&fixtures.to_string()).unwrap())
    }

    fn service(
        store: Arc<MemoryFacilityStore>,
        routing: FixtureRoutingProvider,
    ) -> FacilityService {
        FacilityService::new(store, Arc::new(routing))
    }

    const ORIGIN: Coordinate = Coordinate {
        latitude: 13.75,
        longitude: 100.5,
    };

    #[tokio::test]
    async fn test_open_beats_closer_crowded_and_limit_three() {
        let store = store(
            vec![
                facility(1, 13.751, "crowded"),
                facility(2, 13.752, "closed"),
                facility(3, 13.760, "open"),
                facility(4, 13.770, "open"),
                facility(5, 13.780, "open"),
                facility(6, 13.790, "open"),
            ],
            json!([]),
        );

        let ranked = service(store, FixtureRoutingProvider::new())
            .find_nearest(FacilityType::Hospital, ORIGIN)
            .await
            .unwrap();

        assert_eq!(ranked.iter().map(|r| r.facility.id).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(ranked.iter().all(|r| r.facility.status == FacilityStatus::Open));
        assert!(ranked[0].distance < ranked[1].distance);
        assert!(ranked[0].time <= ranked[1].time);
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_not_error() {
        let ranked = service(store(vec![], json!([])), FixtureRoutingProvider::new())
            .find_nearest(FacilityType::Police, ORIGIN)
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_unroutable_candidate_is_upstream_error() {
        let store = store(vec![facility(1, 13.76, "open"), facility(2, 13.77, "open")], json!([]));
        let routing = FixtureRoutingProvider::new().with_unroutable(Coordinate::new(13.77, 100.5));

        let err = service(store, routing)
            .find_nearest(FacilityType::Hospital, ORIGIN)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoutingServiceError);
        assert_eq!(err.http_status(), 500);
    }

    #[tokio::test]
    async fn test_detail_average_and_not_found() {
        let store = store(
            vec![facility(1, 13.76, "open")],
            json!([
                {"id": 1, "facilityId": 1, "reviewerName": "A", "rating": 5.0, "comment": null},
                {"id": 2, "facilityId": 1, "reviewerName": "B", "rating": 2.0, "comment": null}
            ]),
        );
        let service = service(store, FixtureRoutingProvider::new());

        let detail = service.facility_detail(1).await.unwrap();
        assert_eq!(detail.average_rating, 3.5);
        assert_eq!(detail.reviews.len(), 2);

        let err = service.facility_detail(404).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FacilityNotFound);
        assert_eq!(err.http_status(), 404);
    }

    #[tokio::test]
    async fn test_geocode_match_and_no_match() {
        let routing =
            FixtureRoutingProvider::new().with_place("Siam", Coordinate::new(13.7462, 100.5347));
        let service = service(store(vec![], json!([])), routing);

        assert_eq!(service.geocode("siam").await.unwrap(), Coordinate::new(13.7462, 100.5347));
        let err = service.geocode("Atlantis").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NoGeocodeMatch);
    }

    #[tokio::test]
    async fn test_directions_pass_through() {
        let service = service(store(vec![], json!([])), FixtureRoutingProvider::new());
        let response = service
            .directions(ORIGIN, Coordinate::new(13.8, 100.55))
            .await
            .unwrap();
        assert!(route_geometry(&response).is_some());
        assert_eq!(response["metadata"]["query"]["coordinates"][1], json!([100.55, 13.8]));
    }
}
