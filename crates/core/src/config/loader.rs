//! Configuration file loading

use super::schema::{ConfigSchema, GeocodeScope};
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or standard locations, then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let mut config = Self {
            schema,
            path: config_path,
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        tracing::debug!(path = ?config.path, "Configuration loaded");
        Ok(config)
    }

    /// Load with defaults only (no file, no environment)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Overlay environment variables on top of file values.
    ///
    /// Reads:
    /// - `DATABASE_URL`
    /// - `ORS_API_KEY`, `ORS_BASE_URL`
    /// - `PORT`
    /// - `FINDER_LOG_LEVEL`, `FINDER_LOG_FORMAT`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.schema.database.url = Some(url);
        }
        if let Some(key) = lookup("ORS_API_KEY") {
            self.schema.routing.api_key = Some(key);
        }
        if let Some(url) = lookup("ORS_BASE_URL") {
            self.schema.routing.base_url = url;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.schema.server.port = port;
        }
        if let Some(level) = lookup("FINDER_LOG_LEVEL") {
            self.schema.logging.level = level;
        }
        if let Some(format) = lookup("FINDER_LOG_FORMAT").and_then(|f| f.parse().ok()) {
            self.schema.logging.format = format;
        }
    }

    /// Validate values that would otherwise fail deep inside a request
    pub fn validate(&self) -> Result<()> {
        let routing = &self.schema.routing;
        if !routing.base_url.starts_with("http://") && !routing.base_url.starts_with("https://") {
            return Err(Error::config_invalid(
                "routing.base_url",
                "must start with http:// or https://",
            ));
        }
        if routing.timeout_secs == 0 {
            return Err(Error::config_invalid("routing.timeout_secs", "cannot be zero"));
        }
        if !(1..=10).contains(&routing.polyline_precision) {
            return Err(Error::config_invalid(
                "routing.polyline_precision",
                "must be between 1 and 10",
            ));
        }

        if self.schema.database.max_connections == 0 {
            return Err(Error::config_invalid("database.max_connections", "cannot be zero"));
        }

        if let GeocodeScope::Regional { country, bbox } = &self.schema.geocode {
            if country.is_none() && bbox.is_none() {
                return Err(Error::config_invalid(
                    "geocode",
                    "regional scope needs a country, a bbox, or both",
                ));
            }
            if bbox.is_some_and(|b| !b.is_valid()) {
                return Err(Error::config_invalid("geocode.bbox", "corners out of order or range"));
            }
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["finder.toml", ".finder.toml", ".config/finder.toml"];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    if !Path::new(path).exists() {
        return Err(Error::config_not_found(path));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {path}")).with_source(e))?;

    toml::from_str(&content).map_err(Error::from).context(path)
}
