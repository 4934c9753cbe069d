//! Error types for the API client

use finder_core::{Error, ErrorCode};
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error body from the provider
        message: String,
    },

    /// Provider answered 2xx with a body we cannot use
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Coordinates rejected before sending
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if the request timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// Convert into a core error attributed to `service`.
    ///
    /// Every provider failure is an upstream failure from the caller's point
    /// of view, so the result always maps to a 5xx.
    #[must_use]
    pub fn into_upstream(self, service: ErrorCode) -> Error {
        let code = if self.is_timeout() {
            ErrorCode::UpstreamTimeout
        } else {
            service
        };
        Error::upstream(code, format!("{} call failed", service_name(service))).with_source(self)
    }
}

fn service_name(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::RoutingServiceError => "Matrix",
        ErrorCode::GeocodeServiceError => "Geocode",
        ErrorCode::DirectionsServiceError => "Directions",
        _ => "Provider",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ApiError::api_response(403, "forbidden").is_client_error());
        assert!(ApiError::api_response(502, "bad gateway").is_server_error());
        assert!(!ApiError::invalid_response("no rows").is_client_error());
        assert!(!ApiError::config("x").is_timeout());
    }

    #[test]
    fn test_into_upstream_is_server_error() {
        let err = ApiError::api_response(403, "Access to this API has been disallowed")
            .into_upstream(ErrorCode::GeocodeServiceError);

        assert_eq!(err.code, ErrorCode::GeocodeServiceError);
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.public_message(), finder_core::error::GENERIC_SERVER_MESSAGE);
        assert!(err.to_string().contains("disallowed"));
    }
}
