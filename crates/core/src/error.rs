//! Error taxonomy shared by every facility-finder crate
//!
//! Errors carry a numeric [`ErrorCode`] whose thousands digit selects the
//! category. The category decides how the HTTP layer reports the error:
//! - 6xxx validation errors become `400 Bad Request`
//! - 7xxx lookup misses become `404 Not Found`
//! - everything else is an internal or upstream failure and becomes
//!   `500 Internal Server Error` with a generic body

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message returned to clients for every 5xx response.
pub const GENERIC_SERVER_MESSAGE: &str = "Internal server error";

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Validation errors (6xxx)
    ValidationError = 6000,
    InvalidInput = 6001,
    MissingParameter = 6002,
    InvalidFormat = 6003,

    // Lookup errors (7xxx)
    FacilityNotFound = 7001,
    NoGeocodeMatch = 7002,

    // Upstream errors (9xxx)
    DatabaseError = 9001,
    RoutingServiceError = 9002,
    GeocodeServiceError = 9003,
    DirectionsServiceError = 9004,
    UpstreamTimeout = 9005,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            6 => "Validation",
            7 => "NotFound",
            9 => "Upstream",
            _ => "Unknown",
        }
    }

    /// HTTP status the API layer reports for this code
    pub fn http_status(&self) -> u16 {
        match self.code() / 1000 {
            6 => 400,
            7 => 404,
            _ => 500,
        }
    }

    /// Whether the caller, not the server, is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({ctx})")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status for this error
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Message safe to send to a client.
    ///
    /// Client errors expose their message; server errors never leak detail.
    pub fn public_message(&self) -> String {
        if self.code.is_client_error() {
            self.message.clone()
        } else {
            GENERIC_SERVER_MESSAGE.to_string()
        }
    }

    // Convenience constructors

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
    }

    pub fn config_invalid(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigValidationError,
            format!("Invalid configuration value for {field}: {}", message.into()),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            ErrorCode::MissingParameter,
            format!("Missing required parameter: {name}"),
        )
    }

    pub fn facility_not_found(id: i64) -> Self {
        Self::new(ErrorCode::FacilityNotFound, format!("Facility {id} not found"))
    }

    pub fn no_geocode_match(text: &str) -> Self {
        Self::new(
            ErrorCode::NoGeocodeMatch,
            format!("No location found for '{text}'"),
        )
    }

    pub fn upstream(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for the server binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 3;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidFormat, format!("JSON parse error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::FacilityNotFound.to_string(), "E7001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::MissingParameter.category(), "Validation");
        assert_eq!(ErrorCode::RoutingServiceError.category(), "Upstream");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::MissingParameter.http_status(), 400);
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::FacilityNotFound.http_status(), 404);
        assert_eq!(ErrorCode::NoGeocodeMatch.http_status(), 404);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
        assert_eq!(ErrorCode::UpstreamTimeout.http_status(), 500);
    }

    #[test]
    fn test_public_message_hides_upstream_detail() {
        let err = Error::database("connection refused to 10.0.0.4:5432");
        assert_eq!(err.public_message(), GENERIC_SERVER_MESSAGE);

        let err = Error::missing_parameter("lat");
        assert_eq!(err.public_message(), "Missing required parameter: lat");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::facility_not_found(42).with_context("GET /api/facility/42");
        assert_eq!(err.code, ErrorCode::FacilityNotFound);
        assert!(err.to_string().contains("GET /api/facility/42"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("bad value"));
        let err = result.context("finder.toml").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.context.as_deref(), Some("finder.toml"));
    }
}
