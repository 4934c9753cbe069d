//! PostgreSQL + PostGIS facility store.

use super::{FacilityStore, PoolStats, StoreError};
use async_trait::async_trait;
use finder_geo::{parse_postgis_point, Coordinate};
use finder_ranking::{Facility, FacilityStatus, FacilityType, Review};
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::{debug, instrument};

/// Schema migrations shipped with the server.
pub static MIGRATOR: Migrator = sqlx::migrate!();

const NEAREST_SQL: &str = r#"
    SELECT
        id,
        name,
        address,
        type AS facility_type,
        ST_AsGeoJSON(location::geometry)::jsonb AS location,
        status,
        rating::float8 AS rating,
        phone,
        messaging
    FROM facilities
    WHERE type = $1
    ORDER BY ST_Distance(location, ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography), id
    LIMIT $4
"#;

const FACILITY_SQL: &str = r#"
    SELECT
        id,
        name,
        address,
        type AS facility_type,
        ST_AsGeoJSON(location::geometry)::jsonb AS location,
        status,
        rating::float8 AS rating,
        phone,
        messaging
    FROM facilities
    WHERE id = $1
"#;

const REVIEWS_SQL: &str = r#"
    SELECT id, facility_id, reviewer_name, rating::float8 AS rating, comment
    FROM reviews
    WHERE facility_id = $1
    ORDER BY id
"#;

#[derive(Debug, sqlx::FromRow)]
struct FacilityRow {
    id: i64,
    name: String,
    address: String,
    facility_type: String,
    location: serde_json::Value,
    status: String,
    rating: f64,
    phone: Option<String>,
    messaging: Option<String>,
}

impl TryFrom<FacilityRow> for Facility {
    type Error = StoreError;

    fn try_from(row: FacilityRow) -> Result<Self, Self::Error> {
        let facility_type: FacilityType =
            row.facility_type
                .parse()
                .map_err(|reason| StoreError::InvalidRow {
                    id: row.id,
                    field: "type",
                    reason,
                })?;

        let position = parse_postgis_point(&row.location).map_err(|e| StoreError::InvalidRow {
            id: row.id,
            field: "location",
            reason: e.to_string(),
        })?;

        Ok(Facility {
            id: row.id,
            name: row.name,
            address: row.address,
            facility_type,
            lat: position.latitude,
            lon: position.longitude,
            status: FacilityStatus::from_stored(&row.status),
            rating: row.rating,
            phone: row.phone,
            messaging: row.messaging,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    facility_id: i64,
    reviewer_name: String,
    rating: f64,
    comment: Option<String>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            facility_id: row.facility_id,
            reviewer_name: row.reviewer_name,
            rating: row.rating,
            comment: row.comment,
        }
    }
}

/// Facility store backed by a pooled PostgreSQL connection.
///
/// Each method runs a single statement; connections go back to the pool as
/// soon as the statement completes.
#[derive(Clone)]
pub struct PgFacilityStore {
    pool: PgPool,
}

impl PgFacilityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FacilityStore for PgFacilityStore {
    #[instrument(skip(self))]
    async fn nearest_by_type(
        &self,
        facility_type: FacilityType,
        origin: Coordinate,
        limit: usize,
    ) -> Result<Vec<Facility>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, FacilityRow>(NEAREST_SQL)
            .bind(facility_type.as_str())
            .bind(origin.longitude)
            .bind(origin.latitude)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(candidates = rows.len(), "Fetched nearest facilities");
        rows.into_iter().map(Facility::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn facility(&self, id: i64) -> Result<Option<Facility>, StoreError> {
        sqlx::query_as::<_, FacilityRow>(FACILITY_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Facility::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn reviews(&self, facility_id: i64) -> Result<Vec<Review>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(REVIEWS_SQL)
            .bind(facility_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(facility_type: &str, location: serde_json::Value, status: &str) -> FacilityRow {
        FacilityRow {
            id: 7,
            name: "Ramathibodi Hospital".to_string(),
            address: "270 Rama VI Rd".to_string(),
            facility_type: facility_type.to_string(),
            location,
            status: status.to_string(),
            rating: 4.2,
            phone: Some("+66 2 201 1000".to_string()),
            messaging: None,
        }
    }

    #[test]
    fn test_row_conversion() {
        let facility = Facility::try_from(row(
            "hospital",
            json!({"type": "Point", "coordinates": [100.5265, 13.7659]}),
            "Crowded",
        ))
        .unwrap();

        assert_eq!(facility.facility_type, FacilityType::Hospital);
        assert_eq!(facility.lat, 13.7659);
        assert_eq!(facility.lon, 100.5265);
        assert_eq!(facility.status, FacilityStatus::Crowded);
    }

    #[test]
    fn test_unrecognised_status_is_unknown() {
        let facility = Facility::try_from(row(
            "clinic",
            json!({"type": "Point", "coordinates": [100.5, 13.7]}),
            "maintenance",
        ))
        .unwrap();
        assert_eq!(facility.status, FacilityStatus::Unknown);
    }

    #[test]
    fn test_invalid_rows() {
        let point = json!({"type": "Point", "coordinates": [100.5, 13.7]});
        let err = Facility::try_from(row("spa", point, "open")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRow { id: 7, field: "type", .. }));

        let line = json!({"type": "LineString", "coordinates": []});
        let err = Facility::try_from(row("clinic", line, "open")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRow { field: "location", .. }));
    }
}
