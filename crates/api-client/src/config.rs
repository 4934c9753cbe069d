//! Configuration for the routing provider client
//!
//! Built from the `routing` and `geocode` sections of the server
//! configuration.

use crate::error::{ApiError, ApiResult};
use finder_core::config::{GeocodeScope, RoutingConfig};
use std::time::Duration;

/// Default public OpenRouteService endpoint
const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider base URL, without trailing path
    pub base_url: String,
    /// API key sent in the `Authorization` header
    pub api_key: Option<String>,
    /// Per-call timeout
    pub timeout: Duration,
    /// Routing profile for matrix and directions calls
    pub profile: String,
    /// Scope applied to geocoding searches
    pub geocode_scope: GeocodeScope,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            profile: "driving-car".to_string(),
            geocode_scope: GeocodeScope::Global,
        }
    }
}

impl ClientConfig {
    /// Create configuration from the server's routing and geocode sections
    #[must_use]
    pub fn from_routing(routing: &RoutingConfig, scope: &GeocodeScope) -> Self {
        Self {
            base_url: routing.base_url.clone(),
            api_key: routing.api_key.clone(),
            timeout: Duration::from_secs(routing.timeout_secs),
            profile: routing.profile.clone(),
            geocode_scope: scope.clone(),
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set geocode scope
    #[must_use]
    pub fn with_geocode_scope(mut self, scope: GeocodeScope) -> Self {
        self.geocode_scope = scope;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.profile.is_empty() || self.profile.contains('/') {
            return Err(ApiError::config("profile must be a single path segment"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.base_url.contains("openrouteservice"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.geocode_scope, GeocodeScope::Global);
    }

    #[test]
    fn test_from_routing() {
        let routing = RoutingConfig {
            base_url: "http://localhost:8082/ors".to_string(),
            api_key: Some("key".to_string()),
            timeout_secs: 3,
            ..RoutingConfig::default()
        };
        let scope = GeocodeScope::Regional {
            country: Some("TH".to_string()),
            bbox: None,
        };

        let config = ClientConfig::from_routing(&routing, &scope);
        assert_eq!(config.base_url, "http://localhost:8082/ors");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.geocode_scope, scope);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_api_key("abc")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default().with_base_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());
    }
}
