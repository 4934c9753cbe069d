//! Facility ranking for facility-finder.
//!
//! This crate provides:
//! - The facility and review model
//! - Index-keyed joining of driving metrics onto candidates
//! - Status-aware ranking on driving distance
//! - Review aggregation for the detail view
//!
//! Nothing here performs I/O. The server fetches candidates and matrix
//! results, then hands them to [`enrich`] and [`top_results`].

mod detail;
mod enrich;
mod error;
mod model;
mod rank;

pub use detail::average_rating;
pub use enrich::{check_candidate_count, duration_minutes, enrich, RouteMetric};
pub use error::{RankingError, Result};
pub use model::{Facility, FacilityDetail, FacilityStatus, FacilityType, RankedFacility, Review};
pub use rank::{rank, top_results, MAX_CANDIDATES, MAX_RESULTS};
