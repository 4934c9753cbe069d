//! Joining driving metrics onto candidates.
//!
//! A matrix request lists one destination per candidate. Each
//! [`RouteMetric`] names the destination it belongs to, and results are
//! joined on that index, so the join holds even if the provider adapter
//! reorders or filters its output.

use crate::error::{RankingError, Result};
use crate::model::{Facility, RankedFacility};
use crate::rank::MAX_CANDIDATES;
use std::collections::BTreeMap;

/// Driving metrics from the requester to one destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetric {
    /// Zero-based index into the candidate list sent to the matrix
    pub destination: usize,
    /// Driving distance in kilometers, `None` if unroutable
    pub distance_km: Option<f64>,
    /// Driving duration in seconds, `None` if unroutable
    pub duration_secs: Option<f64>,
}

/// Reject candidate lists the matrix service will not accept.
pub fn check_candidate_count(count: usize) -> Result<()> {
    if count > MAX_CANDIDATES {
        return Err(RankingError::TooManyCandidates {
            count,
            limit: MAX_CANDIDATES,
        });
    }
    Ok(())
}

/// Attach driving distance and time to every candidate.
///
/// The output has one entry per candidate, in candidate order.
///
/// # Errors
/// Fails if the metrics do not cover each candidate exactly once, or if any
/// candidate is unroutable.
pub fn enrich(candidates: Vec<Facility>, metrics: Vec<RouteMetric>) -> Result<Vec<RankedFacility>> {
    if metrics.len() != candidates.len() {
        return Err(RankingError::MetricCountMismatch {
            expected: candidates.len(),
            actual: metrics.len(),
        });
    }

    let mut by_destination = BTreeMap::new();
    for metric in metrics {
        if metric.destination >= candidates.len() {
            return Err(RankingError::UnknownDestination(metric.destination));
        }
        if by_destination.insert(metric.destination, metric).is_some() {
            return Err(RankingError::DuplicateDestination(metric.destination));
        }
    }

    candidates
        .into_iter()
        .enumerate()
        .map(|(index, facility)| {
            let metric = by_destination
                .remove(&index)
                .ok_or(RankingError::MissingDestination(index))?;

            let (Some(distance), Some(duration)) = (metric.distance_km, metric.duration_secs) else {
                return Err(RankingError::Unroutable {
                    facility_id: facility.id,
                });
            };

            Ok(RankedFacility::new(facility, distance, duration_minutes(duration)))
        })
        .collect()
}

/// Seconds to whole minutes, rounded to nearest
pub fn duration_minutes(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds / 60.0).round() as u32
}
