//! In-memory facility store loaded from JSON fixtures.
//!
//! Used for local development without a database and by the HTTP tests.
//! Candidate selection matches the PostGIS store: geodesic distance, ties
//! broken by id.

use super::{FacilityStore, StoreError};
use async_trait::async_trait;
use finder_geo::{nearest, Coordinate};
use finder_ranking::{Facility, FacilityType, Review};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixture file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Facility store holding everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFacilityStore {
    facilities: Vec<Facility>,
    reviews: Vec<Review>,
}

impl MemoryFacilityStore {
    /// Build a store from fixtures, rejecting facilities with bad positions
    /// and reviews of unknown facilities.
    pub fn new(fixtures: Fixtures) -> Result<Self, StoreError> {
        let Fixtures {
            mut facilities,
            reviews,
        } = fixtures;

        if let Some(bad) = facilities.iter().find(|f| !f.coordinate().is_valid()) {
            return Err(StoreError::InvalidRow {
                id: bad.id,
                field: "location",
                reason: format!("({}, {}) is out of range", bad.lat, bad.lon),
            });
        }
        if let Some(orphan) = reviews
            .iter()
            .find(|r| !facilities.iter().any(|f| f.id == r.facility_id))
        {
            return Err(StoreError::Fixtures(format!(
                "review {} refers to unknown facility {}",
                orphan.id, orphan.facility_id
            )));
        }

        facilities.sort_by_key(|f| f.id);
        Ok(Self {
            facilities,
            reviews,
        })
    }

    /// Parse fixtures from a JSON document
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let fixtures: Fixtures =
            serde_json::from_str(json).map_err(|e| StoreError::Fixtures(e.to_string()))?;
        Self::new(fixtures)
    }

    /// Load fixtures from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Fixtures(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

#[async_trait]
impl FacilityStore for MemoryFacilityStore {
    async fn nearest_by_type(
        &self,
        facility_type: FacilityType,
        origin: Coordinate,
        limit: usize,
    ) -> Result<Vec<Facility>, StoreError> {
        let of_type: Vec<&Facility> = self
            .facilities
            .iter()
            .filter(|f| f.facility_type == facility_type)
            .collect();

        let positions: Vec<Coordinate> = of_type.iter().map(|f| f.coordinate()).collect();
        Ok(nearest(&origin, &positions, limit)
            .into_iter()
            .map(|r| of_type[r.index].clone())
            .collect())
    }

    async fn facility(&self, id: i64) -> Result<Option<Facility>, StoreError> {
        Ok(self.facilities.iter().find(|f| f.id == id).cloned())
    }

    async fn reviews(&self, facility_id: i64) -> Result<Vec<Review>, StoreError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| r.facility_id == facility_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| r.id);
        Ok(reviews)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
