//! Free-text geocoding endpoint

use crate::client::RoutingClient;
use crate::error::{ApiError, ApiResult};
use finder_core::config::GeocodeScope;
use finder_geo::Coordinate;
use serde::Deserialize;

/// Geocoding API interface
#[derive(Clone)]
pub struct GeocodeApi {
    client: RoutingClient,
}

impl GeocodeApi {
    /// Create a new geocoding API interface
    pub(crate) fn new(client: RoutingClient) -> Self {
        Self { client }
    }

    /// Coordinates of the best match for `text`, or `None` if nothing matched.
    ///
    /// GET /geocode/search
    pub async fn search(&self, text: &str) -> ApiResult<Option<Coordinate>> {
        let query = search_params(text, &self.client.config().geocode_scope);
        let collection: FeatureCollection = self.client.get("geocode/search", &query).await?;
        collection.first_coordinate()
    }
}

/// Query parameters for a single-result search within `scope`
pub fn search_params(text: &str, scope: &GeocodeScope) -> Vec<(String, String)> {
    let mut params = vec![
        ("text".to_string(), text.to_string()),
        ("size".to_string(), "1".to_string()),
    ];

    if let GeocodeScope::Regional { country, bbox } = scope {
        if let Some(country) = country {
            params.push(("boundary.country".to_string(), country.clone()));
        }
        if let Some(bbox) = bbox {
            params.extend([
                ("boundary.rect.min_lon".to_string(), bbox.min_lon.to_string()),
                ("boundary.rect.min_lat".to_string(), bbox.min_lat.to_string()),
                ("boundary.rect.max_lon".to_string(), bbox.max_lon.to_string()),
                ("boundary.rect.max_lat".to_string(), bbox.max_lat.to_string()),
            ]);
        }
    }

    params
}

/// GeoJSON feature collection returned by the search
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Matches, best first
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One geocoding match
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Point geometry of the match
    pub geometry: Geometry,
}

/// GeoJSON point geometry
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// `[lon, lat]`
    pub coordinates: Vec<f64>,
}

impl FeatureCollection {
    /// Point of the first feature, `None` when there are no features.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidResponse`] if the first feature's geometry
    /// is not a `[lon, lat]` pair within WGS84 bounds.
    pub fn first_coordinate(&self) -> ApiResult<Option<Coordinate>> {
        let Some(feature) = self.features.first() else {
            return Ok(None);
        };
        let coord = match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => Coordinate::new(*lat, *lon),
            other => {
                return Err(ApiError::invalid_response(format!(
                    "geocode geometry has {} ordinates",
                    other.len()
                )));
            }
        };
        if !coord.is_valid() {
            return Err(ApiError::invalid_response(format!(
                "geocode point out of range: ({}, {})",
                coord.latitude, coord.longitude
            )));
        }
        Ok(Some(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_core::config::BoundingBox;
    use serde_json::json;

    #[test]
    fn test_global_params() {
        let params = search_params("Siam Paragon", &GeocodeScope::Global);
        assert_eq!(
            params,
            vec![
                ("text".to_string(), "Siam Paragon".to_string()),
                ("size".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_regional_params() {
        let scope = GeocodeScope::Regional {
            country: Some("TH".to_string()),
            bbox: Some(BoundingBox {
                min_lon: 97.3,
                min_lat: 5.6,
                max_lon: 105.6,
                max_lat: 20.5,
            }),
        };
        let params = search_params("Chiang Mai", &scope);

        assert!(params.contains(&("boundary.country".to_string(), "TH".to_string())));
        assert!(params.contains(&("boundary.rect.min_lon".to_string(), "97.3".to_string())));
        assert!(params.contains(&("boundary.rect.max_lat".to_string(), "20.5".to_string())));
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn test_first_coordinate() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [100.5347, 13.7462]},
                    "properties": {"label": "Siam Paragon"}
                },
                {
                    "type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
                    "properties": {}
                }
            ]
        }))
        .unwrap();

        assert_eq!(
            collection.first_coordinate().unwrap(),
            Some(Coordinate::new(13.7462, 100.5347))
        );
    }

    #[test]
    fn test_no_match() {
        let collection: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection", "features": []})).unwrap();
        assert_eq!(collection.first_coordinate().unwrap(), None);

        let bare: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection"})).unwrap();
        assert_eq!(bare.first_coordinate().unwrap(), None);
    }

    #[test]
    fn test_unusable_geometry_is_invalid_response() {
        let broken = [json!([100.5]), json!([]), json!([200.0, 13.7]), json!([100.5, -95.0])];
        for coordinates in broken {
            let collection: FeatureCollection = serde_json::from_value(json!({
                "features": [{"geometry": {"type": "Point", "coordinates": coordinates}}]
            }))
            .unwrap();
            let err = collection.first_coordinate().unwrap_err();
            assert!(matches!(err, ApiError::InvalidResponse(_)), "{coordinates}");
        }
    }
}
