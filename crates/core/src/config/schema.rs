//! Configuration schema definitions
//!
//! Every section has serde defaults so an empty `finder.toml` (or none at
//! all) yields a runnable development configuration, provided the database
//! URL and routing API key come from the environment.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub geocode: GeocodeScope,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_grace_secs() -> u64 {
    10
}

/// PostgreSQL/PostGIS connection pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, usually supplied through `DATABASE_URL`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing the query
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Apply bundled migrations on startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            run_migrations: false,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

/// Routing, matrix and directions provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Provider base URL (OpenRouteService compatible)
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,

    /// API key, usually supplied through `ORS_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_routing_timeout_secs")]
    pub timeout_secs: u64,

    /// Routing profile used for matrix and directions calls
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Decimal precision of encoded route geometries
    #[serde(default = "default_polyline_precision")]
    pub polyline_precision: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
            api_key: None,
            timeout_secs: default_routing_timeout_secs(),
            profile: default_profile(),
            polyline_precision: default_polyline_precision(),
        }
    }
}

fn default_routing_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

fn default_routing_timeout_secs() -> u64 {
    10
}

fn default_profile() -> String {
    "driving-car".to_string()
}

fn default_polyline_precision() -> u32 {
    5
}

/// Geographic scope applied to free-text geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum GeocodeScope {
    /// Search worldwide
    #[default]
    Global,
    /// Restrict results to a country and/or a bounding box
    Regional {
        /// ISO 3166-1 alpha-2 or alpha-3 country code
        #[serde(default)]
        country: Option<String>,
        #[serde(default)]
        bbox: Option<BoundingBox>,
    },
}

/// Longitude/latitude rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Whether the corners are ordered and inside WGS84 bounds
    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.min_lon)
            && (-180.0..=180.0).contains(&self.max_lon)
            && (-90.0..=90.0).contains(&self.min_lat)
            && (-90.0..=90.0).contains(&self.max_lat)
            && self.min_lon < self.max_lon
            && self.min_lat < self.max_lat
    }
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}
