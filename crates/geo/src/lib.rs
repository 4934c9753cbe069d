//! Geospatial primitives for facility-finder.
//!
//! This crate provides:
//! - The [`Coordinate`] type shared by the store, ranking and routing layers
//! - Haversine (great-circle) distance, used when no geography-aware store
//!   is available to compute geodesic distance
//! - Geodesic nearest-N selection with optional parallelism
//! - PostGIS POINT parsing (GeoJSON and WKT)
//! - Encoded polyline decoding/encoding for route geometries
//! - WASM bindings so the browser client decodes routes with the same code
//!
//! # Example
//!
//! ```
//! use finder_geo::{polyline, Coordinate};
//!
//! let encoded = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";
//! let route = polyline::decode(encoded, polyline::DEFAULT_PRECISION).unwrap();
//! assert_eq!(route.len(), 3);
//! assert_eq!(route[0], Coordinate::new(38.5, -120.2));
//! ```

mod error;
mod haversine;
pub mod nearest;
pub mod polyline;
mod postgis;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GeoError, Result};
pub use haversine::{haversine_distance, EARTH_RADIUS_KM};
pub use nearest::{nearest, DistanceResult, Located};
pub use postgis::parse_postgis_point;

/// A geographic coordinate with latitude and longitude in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components are finite and within WGS84 bounds.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `[longitude, latitude]` order, as routing and GeoJSON APIs expect.
    #[inline]
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_lon_lat_order() {
        let coord: Coordinate = (13.7563, 100.5018).into();
        assert_eq!(coord.lon_lat(), [100.5018, 13.7563]);
    }
}
