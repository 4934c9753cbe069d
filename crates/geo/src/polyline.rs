//! Encoded polyline codec.
//!
//! Route geometries come back from the directions service as an encoded
//! polyline: each coordinate is stored as the delta from the previous one,
//! scaled by `10^precision`, zig-zag folded so the sign lives in the lowest
//! bit, then split into 5-bit groups. Each group is written as one ASCII
//! character offset by 63, with `0x20` set on every group except the last.
//!
//! The precision is not carried in the string. Decoding a precision-5
//! geometry at precision 6 yields coordinates off by a factor of ten, so the
//! caller must know what the service emits.

use crate::{Coordinate, GeoError, Result};

/// Precision used by the directions service for encoded geometries.
pub const DEFAULT_PRECISION: u32 = 5;

const CHAR_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;
const LAST_GROUP_MASK: u64 = 0x0f;
const MAX_SHIFT: u32 = 60;

/// Decode an encoded polyline into `(latitude, longitude)` pairs.
///
/// An empty string decodes to an empty route.
///
/// # Errors
/// Returns [`GeoError::InvalidPolyline`] for characters outside `?`..=`~`,
/// a final group that still has its continuation bit set, a latitude with no
/// longitude, or a value too large for 64 bits.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>> {
    let factor = scale(precision)?;
    let bytes = encoded.as_bytes();

    let mut coords = Vec::with_capacity(bytes.len() / 4);
    let mut position = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while position < bytes.len() {
        lat = lat.wrapping_add(next_value(bytes, &mut position)?);
        if position >= bytes.len() {
            return Err(GeoError::InvalidPolyline {
                position,
                reason: "latitude without longitude",
            });
        }
        lon = lon.wrapping_add(next_value(bytes, &mut position)?);

        coords.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor));
    }

    Ok(coords)
}

/// Encode coordinates as a polyline at the given precision.
///
/// # Errors
/// Returns [`GeoError::InvalidCoordinate`] if any coordinate is outside
/// WGS84 bounds.
pub fn encode(coords: &[Coordinate], precision: u32) -> Result<String> {
    let factor = scale(precision)?;
    let mut out = String::with_capacity(coords.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for coord in coords {
        if !coord.is_valid() {
            return Err(GeoError::InvalidCoordinate(format!(
                "({}, {})",
                coord.latitude, coord.longitude
            )));
        }

        let lat = (coord.latitude * factor).round() as i64;
        let lon = (coord.longitude * factor).round() as i64;

        push_value(lat - prev_lat, &mut out);
        push_value(lon - prev_lon, &mut out);

        prev_lat = lat;
        prev_lon = lon;
    }

    Ok(out)
}

fn scale(precision: u32) -> Result<f64> {
    if !(1..=10).contains(&precision) {
        return Err(GeoError::UnsupportedPrecision(precision));
    }
    Ok(10f64.powi(precision as i32))
}

/// Read one zig-zag encoded signed delta starting at `position`.
fn next_value(bytes: &[u8], position: &mut usize) -> Result<i64> {
    let mut folded: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*position) else {
            return Err(GeoError::InvalidPolyline {
                position: *position,
                reason: "truncated value",
            });
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(GeoError::InvalidPolyline {
                position: *position,
                reason: "character outside encoding alphabet",
            });
        }

        let chunk = u64::from(byte - CHAR_OFFSET);
        let bits = chunk & CHUNK_MASK;
        // Only the low four bits of the thirteenth group fit in 64 bits.
        if shift > MAX_SHIFT || (shift == MAX_SHIFT && bits > LAST_GROUP_MASK) {
            return Err(GeoError::InvalidPolyline {
                position: *position,
                reason: "value overflows 64 bits",
            });
        }
        *position += 1;

        folded |= bits << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    Ok(((folded >> 1) as i64) ^ -((folded & 1) as i64))
}

fn push_value(value: i64, out: &mut String) {
    let mut folded = ((value << 1) ^ (value >> 63)) as u64;

    while folded >= CONTINUATION_BIT {
        let chunk = (folded & CHUNK_MASK) | CONTINUATION_BIT;
        out.push(char::from(chunk as u8 + CHAR_OFFSET));
        folded >>= 5;
    }
    out.push(char::from(folded as u8 + CHAR_OFFSET));
}
