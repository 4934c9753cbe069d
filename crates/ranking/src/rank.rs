//! Final ordering of enriched candidates.
//!
//! Candidates arrive pre-sorted by straight-line distance from the store.
//! Road distance can disagree with that order, so the driving distance
//! decides here. Status comes first: any open facility outranks every
//! crowded or closed one.

use crate::model::RankedFacility;

/// Most candidates sent to the matrix service in one request.
pub const MAX_CANDIDATES: usize = 20;

/// Most facilities returned to the client.
pub const MAX_RESULTS: usize = 3;

/// Sort by (priority, driving distance) and keep the first `limit`.
///
/// The sort is stable: candidates equal on both keys keep their input order.
pub fn rank(mut facilities: Vec<RankedFacility>, limit: usize) -> Vec<RankedFacility> {
    facilities.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.distance.total_cmp(&b.distance))
    });
    facilities.truncate(limit);
    facilities
}

/// [`rank`] with the client result limit.
pub fn top_results(facilities: Vec<RankedFacility>) -> Vec<RankedFacility> {
    rank(facilities, MAX_RESULTS)
}
