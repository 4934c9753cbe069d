//! HTTP server for facility-finder
//!
//! This crate provides:
//! - The axum router and handlers
//! - The [`FacilityStore`] port with PostGIS and in-memory adapters
//! - The [`RoutingProvider`] port with provider-backed and fixture adapters
//! - [`FacilityService`], which runs the prefilter, enrich, rank pipeline

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod routes;
pub mod routing;
pub mod service;
pub mod state;
pub mod store;

pub use error::{AppError, AppResult};
pub use routes::router;
pub use routing::{FixtureRoutingProvider, OrsRoutingProvider, RoutingProvider};
pub use service::FacilityService;
pub use state::AppState;
pub use store::{
    FacilityStore, MemoryFacilityStore, PgFacilityStore, PoolStats, StoreError, MIGRATOR,
};
