//! Geodesic nearest-N selection with optional parallelism.
//!
//! The production store orders candidates with PostGIS `ST_Distance` over
//! `geography`. In-process stores use this module to produce the same
//! great-circle prefix.

use crate::{haversine_distance, Coordinate};
use serde::{Deserialize, Serialize};

/// Anything with an optional position.
pub trait Located {
    /// Position of the item, if known
    fn position(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn position(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

/// Geodesic distance of one input item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Index of the item in the input slice
    pub index: usize,
    /// Great-circle distance in kilometers (infinite if the item has no valid position)
    pub distance_km: f64,
}

/// Calculate the great-circle distance from `origin` to every item.
///
/// Output order matches input order.
pub fn geodesic_distances<T: Located + Sync>(
    origin: &Coordinate,
    items: &[T],
) -> Vec<DistanceResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| distance_of(origin, index, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| distance_of(origin, index, item))
            .collect()
    }
}

/// Return at most `limit` items closest to `origin`, nearest first.
///
/// Items without a valid position are excluded. Equal distances keep input
/// order.
///
/// # Example
/// ```
/// use finder_geo::{nearest, Coordinate};
///
/// let origin = Coordinate::new(13.75, 100.50);
/// let points = [
///     Coordinate::new(14.00, 100.50),
///     Coordinate::new(13.76, 100.50),
///     Coordinate::new(13.90, 100.50),
/// ];
///
/// let closest = nearest(&origin, &points, 2);
/// assert_eq!(closest.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2]);
/// ```
pub fn nearest<T: Located + Sync>(
    origin: &Coordinate,
    items: &[T],
    limit: usize,
) -> Vec<DistanceResult> {
    let mut results = geodesic_distances(origin, items);

    results.retain(|r| r.distance_km.is_finite());
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results.truncate(limit);

    results
}

#[inline]
fn distance_of<T: Located>(origin: &Coordinate, index: usize, item: &T) -> DistanceResult {
    let distance_km = item
        .position()
        .filter(Coordinate::is_valid)
        .map_or(f64::INFINITY, |coord| haversine_distance(origin, &coord));

    DistanceResult { index, distance_km }
}
