//! HTTP client for the routing provider used by facility-finder
//!
//! Talks to an OpenRouteService-compatible API for three things:
//!
//! - **Matrix**: driving distance and duration from one origin to many
//!   destinations, tagged by destination index
//! - **Geocode**: free-text search, optionally restricted to a country or
//!   bounding box
//! - **Directions**: a full route, returned as the provider sent it
//!
//! Every request carries the configured API key and an `X-Request-ID`
//! header, taken from the enclosing [`request_id::scope`] when there is one.
//! There is no retry; failures convert to upstream errors with
//! [`ApiError::into_upstream`].
//!
//! # Example
//!
//! ```rust,no_run
//! use finder_api_client::{ClientConfig, RoutingClient};
//! use finder_geo::Coordinate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RoutingClient::with_config(ClientConfig::default().with_api_key("key"))?;
//!
//!     let origin = Coordinate::new(13.7563, 100.5018);
//!     let metrics = client
//!         .matrix()
//!         .driving_metrics(origin, &[Coordinate::new(13.73, 100.53)])
//!         .await?;
//!     println!("{:?}", metrics);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod request_id;

pub use client::RoutingClient;
pub use config::ClientConfig;
pub use endpoints::directions::route_geometry;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::RoutingClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{DirectionsApi, GeocodeApi, MatrixApi};
    pub use crate::error::{ApiError, ApiResult};
}
