//! HTTP mapping of core errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finder_core::Error;
use finder_telemetry::metrics;
use serde_json::json;
use tracing::{debug, error};

/// Handler error, rendered as `{"error": "<message>"}`.
///
/// 4xx responses carry the error message. 5xx responses carry a generic
/// message; the full error chain is logged instead.
#[derive(Debug)]
pub struct AppError(pub Error);

impl<E: Into<Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            metrics().increment("http.errors.server");
            error!(
                code = %err.code,
                category = err.code.category(),
                error = %err,
                "Request failed"
            );
        } else {
            metrics().increment("http.errors.client");
            debug!(
                code = %err.code,
                category = err.code.category(),
                error = %err,
                "Request rejected"
            );
        }

        (status, Json(json!({ "error": err.public_message() }))).into_response()
    }
}

/// Handler result type
pub type AppResult<T> = Result<T, AppError>;
