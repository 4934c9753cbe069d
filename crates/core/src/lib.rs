//! Core utilities for facility-finder
//!
//! This crate provides shared functionality used by the server and its
//! provider clients:
//!
//! - **Error handling**: coded errors whose category decides the HTTP status
//! - **Configuration**: TOML-based configuration with environment overrides
//! - **Validation**: collecting request-parameter validation
//!
//! # Example
//!
//! ```rust,no_run
//! use finder_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("listening on port {}", config.schema.server.port);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, GeocodeScope};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{ValidationResult, Validator};
}
