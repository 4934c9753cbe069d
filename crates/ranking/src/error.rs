//! Error types for the ranking crate.

use thiserror::Error;

/// Result type alias for ranking operations.
pub type Result<T> = std::result::Result<T, RankingError>;

/// Errors raised while joining matrix results onto candidates.
///
/// Every variant means the routing response cannot be trusted for this
/// request; none of them is recoverable by dropping candidates.
#[derive(Debug, Error, PartialEq)]
pub enum RankingError {
    /// The response has a different number of destinations than the request
    #[error("Matrix returned {actual} destinations for {expected} candidates")]
    MetricCountMismatch {
        /// Candidates sent
        expected: usize,
        /// Destinations received
        actual: usize,
    },

    /// A destination index points past the candidate list
    #[error("Matrix destination {0} does not match any candidate")]
    UnknownDestination(usize),

    /// The same destination index appears twice
    #[error("Matrix destination {0} appears more than once")]
    DuplicateDestination(usize),

    /// No result was returned for a candidate
    #[error("Matrix has no result for candidate {0}")]
    MissingDestination(usize),

    /// The routing service could not reach a candidate
    #[error("Facility {facility_id} is unreachable by road")]
    Unroutable {
        /// Facility the route failed for
        facility_id: i64,
    },

    /// Too many candidates for one matrix request
    #[error("{count} candidates exceeds the matrix limit of {limit}")]
    TooManyCandidates {
        /// Candidates supplied
        count: usize,
        /// Maximum allowed
        limit: usize,
    },
}
