//! Visiting-order helpers shared by the trip state and the optimisation
//! pipeline.
//!
//! The optimiser only ever sees waypoints that carry both coordinates. The
//! helpers here build that coordinate query and map the returned permutation
//! back onto the full waypoint set, keeping coordinate-less waypoints in the
//! slots they already occupied.

use std::fmt;

use thiserror::Error;

use crate::Waypoint;

/// Errors raised when an optimiser permutation cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReindexError {
    /// The permutation does not cover every located waypoint exactly once.
    #[error("permutation has {received} entries but {expected} waypoints are located")]
    LengthMismatch {
        /// Number of located waypoints in the set.
        expected: usize,
        /// Number of entries returned by the optimiser.
        received: usize,
    },
    /// A permutation entry points past the located subset.
    #[error("permutation entry {value} at position {position} is out of range for {len} waypoints")]
    OutOfRange {
        /// Position inside the permutation.
        position: usize,
        /// Offending value.
        value: usize,
        /// Number of located waypoints.
        len: usize,
    },
    /// A permutation entry appears more than once.
    #[error("permutation entry {value} appears more than once")]
    Duplicate {
        /// Repeated value.
        value: usize,
    },
    /// The waypoint set changed after the permutation was requested.
    #[error("waypoint set changed from revision {expected} to {current} during the reorder")]
    SetChanged {
        /// Revision the permutation was computed against.
        expected: u64,
        /// Revision currently held by the trip.
        current: u64,
    },
}

/// Semicolon separated `lon,lat` pairs for the located waypoints of a set.
///
/// # Examples
/// ```
/// use roamer_core::{Waypoint, WaypointId, coordinate_query};
///
/// let waypoints = vec![
///     Waypoint::new(WaypointId(1), 51.5, -0.1, 0),
///     Waypoint::unlocated(WaypointId(2), 1),
///     Waypoint::new(WaypointId(3), 48.8, 2.3, 2),
/// ];
/// let query = coordinate_query(&waypoints);
/// assert_eq!(query.as_str(), "-0.1,51.5;2.3,48.8");
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoordinateQuery {
    rendered: String,
    len: usize,
}

impl CoordinateQuery {
    /// Rendered query value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Number of coordinate pairs in the query.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the query carries no coordinates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for CoordinateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Return a copy of `waypoints` ordered by their `index`.
#[must_use]
pub fn sort_by_index(waypoints: &[Waypoint]) -> Vec<Waypoint> {
    let mut sorted = waypoints.to_vec();
    sorted.sort_by_key(|waypoint| waypoint.index);
    sorted
}

/// Build the coordinate query for `waypoints` in slice order.
///
/// Waypoints missing either coordinate are skipped.
#[must_use]
pub fn coordinate_query(waypoints: &[Waypoint]) -> CoordinateQuery {
    let pairs: Vec<String> = waypoints
        .iter()
        .filter_map(Waypoint::lon_lat)
        .map(|(lon, lat)| format!("{lon},{lat}"))
        .collect();
    CoordinateQuery {
        len: pairs.len(),
        rendered: pairs.join(";"),
    }
}

/// Whether indices run `0..n` in slice order.
#[must_use]
pub fn is_contiguous(waypoints: &[Waypoint]) -> bool {
    waypoints
        .iter()
        .enumerate()
        .all(|(position, waypoint)| waypoint.index == position)
}

/// Rewrite every `index` to match slice order.
pub fn reindex(waypoints: &mut [Waypoint]) {
    for (position, waypoint) in waypoints.iter_mut().enumerate() {
        waypoint.index = position;
    }
}

/// Apply an optimiser permutation to a waypoint set ordered by index.
///
/// `order[k]` names the located waypoint (by its position among located
/// waypoints) that should be visited k-th. Coordinate-less waypoints stay in
/// their slots; the located slots are refilled in permutation order. The
/// result is re-indexed `0..n`.
///
/// # Errors
///
/// Returns a [`ReindexError`] when `order` is not a permutation of the
/// located subset. The input is never truncated or padded.
///
/// # Examples
/// ```
/// use roamer_core::{Waypoint, WaypointId, apply_permutation};
///
/// let waypoints = vec![
///     Waypoint::new(WaypointId(10), 1.0, 1.0, 0),
///     Waypoint::new(WaypointId(11), 2.0, 2.0, 1),
///     Waypoint::new(WaypointId(12), 3.0, 3.0, 2),
/// ];
/// let reordered = apply_permutation(&waypoints, &[2, 0, 1])?;
/// let ids: Vec<u64> = reordered.iter().map(|w| w.id.0).collect();
/// assert_eq!(ids, vec![12, 10, 11]);
/// # Ok::<(), roamer_core::ReindexError>(())
/// ```
pub fn apply_permutation(
    waypoints: &[Waypoint],
    order: &[usize],
) -> Result<Vec<Waypoint>, ReindexError> {
    let located: Vec<&Waypoint> = waypoints.iter().filter(|w| w.is_located()).collect();
    validate_permutation(order, located.len())?;

    let mut permuted = order.iter().filter_map(|&value| located.get(value).copied());
    let mut reordered = Vec::with_capacity(waypoints.len());
    for waypoint in waypoints {
        if waypoint.is_located() {
            // Validation guarantees one permuted entry per located slot.
            if let Some(next) = permuted.next() {
                reordered.push(next.clone());
            }
        } else {
            reordered.push(waypoint.clone());
        }
    }
    reindex(&mut reordered);
    Ok(reordered)
}

fn validate_permutation(order: &[usize], len: usize) -> Result<(), ReindexError> {
    if order.len() != len {
        return Err(ReindexError::LengthMismatch {
            expected: len,
            received: order.len(),
        });
    }
    let mut seen = vec![false; len];
    for (position, &value) in order.iter().enumerate() {
        let Some(slot) = seen.get_mut(value) else {
            return Err(ReindexError::OutOfRange {
                position,
                value,
                len,
            });
        };
        if *slot {
            return Err(ReindexError::Duplicate { value });
        }
        *slot = true;
    }
    Ok(())
}
