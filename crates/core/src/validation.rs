//! Request parameter validation
//!
//! Query strings and JSON bodies arrive as optional raw strings. The
//! [`Validator`] collects every problem in one pass so a client sees all
//! missing or malformed parameters at once, and reports them as a single
//! 6xxx error.
//!
//! # Example
//!
//! ```
//! use finder_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("type", Some("hospital"))
//!     .required("lat", None)
//!     .number_in_range("lon", Some("100.5"), -180.0, 180.0)
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].field, "lat");
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Convert to Result type
    ///
    /// Missing parameters take precedence in the error code so callers can
    /// distinguish "you forgot something" from "you sent garbage".
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }

        let code = if self.errors.iter().any(|e| e.code == "REQUIRED") {
            ErrorCode::MissingParameter
        } else {
            ErrorCode::InvalidInput
        };
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        Err(Error::new(code, messages.join("; ")))
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a parameter is present and not blank
    pub fn required(mut self, field: &str, value: Option<&str>) -> Self {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate that a present value is in a list of allowed values
    pub fn one_of(mut self, field: &str, value: Option<&str>, allowed: &[&str]) -> Self {
        if let Some(value) = present(value) {
            if !allowed.contains(&value) {
                self.result.add_error(ValidationError {
                    field: field.to_string(),
                    message: format!("Must be one of: {}", allowed.join(", ")),
                    code: "ONE_OF".to_string(),
                    expected: Some(allowed.join(", ")),
                    actual: Some(value.to_string()),
                });
            }
        }
        self
    }

    /// Validate that a present value is a finite number within `[min, max]`
    ///
    /// Required-ness is checked separately with [`Validator::required`].
    pub fn number_in_range(mut self, field: &str, value: Option<&str>, min: f64, max: f64) -> Self {
        let Some(raw) = present(value) else {
            return self;
        };

        match parse_number(field, raw) {
            Ok(number) if number < min || number > max => {
                self.result.add_error(ValidationError {
                    field: field.to_string(),
                    message: format!("Must be between {min} and {max}"),
                    code: "RANGE".to_string(),
                    expected: Some(format!("{min} - {max}")),
                    actual: Some(raw.to_string()),
                });
            }
            Ok(_) => {}
            Err(_) => {
                self.result.add_error(ValidationError {
                    field: field.to_string(),
                    message: "Must be a number".to_string(),
                    code: "NUMBER".to_string(),
                    expected: Some("finite decimal number".to_string()),
                    actual: Some(raw.to_string()),
                });
            }
        }
        self
    }

    /// Validate a latitude in degrees
    pub fn latitude(self, field: &str, value: Option<&str>) -> Self {
        self.required(field, value).number_in_range(field, value, -90.0, 90.0)
    }

    /// Validate a longitude in degrees
    pub fn longitude(self, field: &str, value: Option<&str>) -> Self {
        self.required(field, value).number_in_range(field, value, -180.0, 180.0)
    }

    /// Get the validation result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Parse a raw parameter as a finite `f64`
pub fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            Error::new(
                ErrorCode::InvalidInput,
                format!("{field}: Must be a number"),
            )
        })
}

/// Parse a parameter that must be present
pub fn require_number(field: &str, raw: Option<&str>) -> Result<f64> {
    let raw = present(raw).ok_or_else(|| Error::missing_parameter(field))?;
    parse_number(field, raw)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
