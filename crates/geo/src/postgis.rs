//! PostGIS POINT parsing utilities.
//!
//! Facility rows select their position as `ST_AsGeoJSON(location)::jsonb`.
//! Hand-maintained fixtures and older dumps store WKT instead, so both are
//! accepted:
//! - GeoJSON: `{"type": "Point", "coordinates": [lon, lat]}`
//! - WKT: `"POINT(lon lat)"` or `"SRID=4326;POINT(lon lat)"`

use crate::{Coordinate, GeoError, Result};
use serde::Deserialize;

#[derive(Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: Option<String>,
    coordinates: Vec<f64>,
}

/// Parse a PostGIS point from a JSON value.
///
/// # Errors
/// Fails when the value is null, not a Point, malformed, or outside WGS84
/// bounds.
///
/// # Example
/// ```
/// use finder_geo::parse_postgis_point;
/// use serde_json::json;
///
/// let geojson = json!({"type": "Point", "coordinates": [100.5018, 13.7563]});
/// let coord = parse_postgis_point(&geojson).unwrap();
/// assert!((coord.latitude - 13.7563).abs() < 1e-9);
///
/// let wkt = json!("SRID=4326;POINT(100.5018 13.7563)");
/// assert_eq!(parse_postgis_point(&wkt).unwrap(), coord);
/// ```
pub fn parse_postgis_point(value: &serde_json::Value) -> Result<Coordinate> {
    let coord = match value {
        serde_json::Value::Object(_) => parse_geojson_point(value)?,
        serde_json::Value::String(wkt) => parse_wkt_point(wkt)?,
        other => return Err(GeoError::UnsupportedLocation(other.to_string())),
    };

    if !coord.is_valid() {
        return Err(GeoError::InvalidCoordinate(format!(
            "({}, {}) outside WGS84 bounds",
            coord.latitude, coord.longitude
        )));
    }
    Ok(coord)
}

fn parse_geojson_point(value: &serde_json::Value) -> Result<Coordinate> {
    let point = GeoJsonPoint::deserialize(value)
        .map_err(|e| GeoError::UnsupportedLocation(e.to_string()))?;

    if point.kind.as_deref().is_some_and(|k| k != "Point") {
        return Err(GeoError::UnsupportedLocation(format!(
            "expected Point geometry, got {}",
            point.kind.unwrap_or_default()
        )));
    }

    match point.coordinates.as_slice() {
        [lon, lat, ..] => Ok(Coordinate::new(*lat, *lon)),
        _ => Err(GeoError::InvalidCoordinate(
            "Point needs at least two ordinates".to_string(),
        )),
    }
}

/// Parse a WKT or EWKT POINT string.
fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();
    let body = wkt.split_once(';').map_or(wkt, |(_srid, rest)| rest).trim();

    let inner = body
        .strip_prefix("POINT")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| GeoError::InvalidWkt(format!("Expected POINT(lon lat), got: {wkt}")))?;

    let parts: Vec<&str> = inner.split_whitespace().collect();
    let [lon, lat] = parts.as_slice() else {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    };

    let lon: f64 = lon
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {lon}")))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {lat}")))?;

    Ok(Coordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_geojson_point() {
        let value = json!({"type": "Point", "coordinates": [100.5018, 13.7563]});
        let coord = parse_postgis_point(&value).unwrap();
        assert!((coord.latitude - 13.7563).abs() < 1e-9);
        assert!((coord.longitude - 100.5018).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geojson_without_type() {
        let value = json!({"coordinates": [100.5018, 13.7563]});
        assert!(parse_postgis_point(&value).is_ok());
    }

    #[test]
    fn test_parse_geojson_rejects_other_geometry() {
        let value = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        assert!(parse_postgis_point(&value).is_err());
    }

    #[test]
    fn test_parse_wkt_variants() {
        for wkt in [
            "POINT(100.5018 13.7563)",
            "POINT (100.5018 13.7563)",
            "SRID=4326;POINT(100.5018 13.7563)",
        ] {
            let coord = parse_postgis_point(&json!(wkt)).unwrap();
            assert!((coord.latitude - 13.7563).abs() < 1e-9, "{wkt}");
        }
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let coord = parse_postgis_point(&json!("POINT(-74.0060 40.7128)")).unwrap();
        assert!((coord.longitude - (-74.0060)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_null_fails() {
        assert!(matches!(
            parse_postgis_point(&json!(null)),
            Err(GeoError::UnsupportedLocation(_))
        ));
    }

    #[test]
    fn test_parse_invalid_wkt() {
        assert!(parse_postgis_point(&json!("POLYGON((0 0, 1 1, 1 0, 0 0))")).is_err());
        assert!(parse_postgis_point(&json!("POINT(1)")).is_err());
    }

    #[test]
    fn test_parse_out_of_range() {
        let err = parse_postgis_point(&json!("POINT(13.75 100.50)")).unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate(_)));
    }
}
