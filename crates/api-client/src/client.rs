//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{DirectionsApi, GeocodeApi, MatrixApi};
use crate::error::{ApiError, ApiResult};
use crate::request_id;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Client for an OpenRouteService-compatible provider
///
/// This client wraps `reqwest` and adds:
/// - API key authentication
/// - Request correlation IDs, carried over from the inbound request
/// - Per-call timeout from configuration
///
/// Calls are made once. A failed call surfaces immediately.
#[derive(Clone)]
pub struct RoutingClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl RoutingClient {
    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, application/geo+json"),
        );
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("facility-finder/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref key) = config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                ApiError::config("api_key contains characters not allowed in a header")
            })?;
            default_headers.insert(AUTHORIZATION, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the distance/duration matrix endpoint
    #[must_use]
    pub fn matrix(&self) -> MatrixApi {
        MatrixApi::new(self.clone())
    }

    /// Access the free-text geocoding endpoint
    #[must_use]
    pub fn geocode(&self) -> GeocodeApi {
        GeocodeApi::new(self.clone())
    }

    /// Access the directions endpoint
    #[must_use]
    pub fn directions(&self) -> DirectionsApi {
        DirectionsApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request with query parameters
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let request = self.inner.request(Method::GET, self.url(path)).query(query);
        self.execute(request).await
    }

    /// Perform a POST request with a JSON body
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.inner.request(Method::POST, self.url(path)).json(body);
        self.execute(request).await
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request once and decode the response
    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResult<T> {
        let request_id = request_id::current().unwrap_or_else(|| Uuid::new_v4().to_string());
        Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let result = request.header(X_REQUEST_ID, &request_id).send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                debug!(
                    request_id = %request_id,
                    status = response.status().as_u16(),
                    elapsed_ms = elapsed.as_millis(),
                    "Provider responded"
                );
                Self::handle_response(response).await
            }
            Err(e) => {
                debug!(
                    request_id = %request_id,
                    elapsed_ms = elapsed.as_millis(),
                    timeout = e.is_timeout(),
                    error = %e,
                    "Provider request failed"
                );
                Err(ApiError::Request(e))
            }
        }
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(ApiError::Json)
        } else {
            let mut message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            truncate_on_char_boundary(&mut message, MAX_ERROR_BODY);
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::default().with_api_key("test-key");
        let client = RoutingClient::with_config(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_base_url("not-a-url");
        assert!(matches!(RoutingClient::with_config(config), Err(ApiError::Config(_))));

        let config = ClientConfig::default().with_api_key("bad\nkey");
        assert!(matches!(RoutingClient::with_config(config), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/ors/");
        let client = RoutingClient::with_config(config).unwrap();
        assert_eq!(
            client.url("/v2/matrix/driving-car"),
            "http://localhost:8080/ors/v2/matrix/driving-car"
        );
        assert_eq!(client.url("geocode/search"), "http://localhost:8080/ors/geocode/search");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        let mut text = "ééé".to_string();
        truncate_on_char_boundary(&mut text, 3);
        assert_eq!(text, "é");

        let mut short = "ok".to_string();
        truncate_on_char_boundary(&mut short, 10);
        assert_eq!(short, "ok");
    }
}
