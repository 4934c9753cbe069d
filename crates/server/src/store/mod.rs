//! Facility storage port and its adapters.
//!
//! | Adapter | Backing | Distance ordering |
//! |---------|---------|-------------------|
//! | [`PgFacilityStore`] | PostgreSQL + PostGIS | `ST_Distance` over `geography` |
//! | [`MemoryFacilityStore`] | JSON fixtures | haversine |

mod memory;
mod postgres;

pub use memory::{Fixtures, MemoryFacilityStore};
pub use postgres::{PgFacilityStore, MIGRATOR};

use async_trait::async_trait;
use finder_core::Error;
use finder_geo::Coordinate;
use finder_ranking::{Facility, FacilityType, Review};
use thiserror::Error;

/// Errors raised by a facility store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query failed or the pool could not hand out a connection
    #[error("facility store query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A stored row cannot be turned into a domain record
    #[error("facility {id} has invalid {field}: {reason}")]
    InvalidRow {
        id: i64,
        field: &'static str,
        reason: String,
    },

    /// Fixture data could not be loaded
    #[error("invalid fixtures: {0}")]
    Fixtures(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::database("Facility store unavailable").with_source(err)
    }
}

/// Connection pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

/// Read access to facilities and their reviews.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Up to `limit` facilities of `facility_type`, nearest to `origin` by
    /// geodesic distance first.
    async fn nearest_by_type(
        &self,
        facility_type: FacilityType,
        origin: Coordinate,
        limit: usize,
    ) -> Result<Vec<Facility>, StoreError>;

    /// A single facility, `None` if the id is unknown.
    async fn facility(&self, id: i64) -> Result<Option<Facility>, StoreError>;

    /// Every review of a facility.
    async fn reviews(&self, facility_id: i64) -> Result<Vec<Review>, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Pool occupancy, `None` for stores that hold no connections.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}
