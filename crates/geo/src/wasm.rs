//! WASM bindings for the geo crate.
//!
//! The browser client draws routes returned by `POST /api/directions`.
//! These bindings let it decode the geometry with the same codec the
//! server tests against.

use crate::{haversine_distance, polyline, Coordinate};
use wasm_bindgen::prelude::*;

/// Decode an encoded route geometry.
///
/// # Returns
/// JSON string `[[lat, lon], ...]`, ready for map libraries that take
/// latitude first.
#[wasm_bindgen(js_name = decodePolyline)]
pub fn decode_polyline(encoded: &str, precision: Option<u32>) -> Result<String, JsValue> {
    let coords = polyline::decode(encoded, precision.unwrap_or(polyline::DEFAULT_PRECISION))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let pairs: Vec<[f64; 2]> = coords.iter().map(|c| [c.latitude, c.longitude]).collect();
    serde_json::to_string(&pairs)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {e}")))
}

/// Straight-line distance between two points in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance(&Coordinate::new(lat1, lon1), &Coordinate::new(lat2, lon2))
}
