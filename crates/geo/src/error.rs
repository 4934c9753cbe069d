//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// Location value is neither GeoJSON nor WKT
    #[error("Unsupported location format: {0}")]
    UnsupportedLocation(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Encoded polyline could not be decoded
    #[error("Invalid polyline at byte {position}: {reason}")]
    InvalidPolyline {
        /// Byte offset where decoding stopped
        position: usize,
        /// What was wrong
        reason: &'static str,
    },

    /// Precision outside the supported range
    #[error("Unsupported polyline precision {0} (expected 1..=10)")]
    UnsupportedPrecision(u32),
}
