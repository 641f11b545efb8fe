//! Shared trip state: the ordered waypoint set and its current path.
//!
//! The waypoint set is an immutable slice swapped wholesale on every change
//! and tagged with a revision. Readers hold a [`DestinationSnapshot`], so a
//! half-reindexed set is never observable, and writers that computed a new
//! order from an older snapshot are refused instead of clobbering newer
//! edits.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::ordering::{ReindexError, is_contiguous, reindex, sort_by_index};
use crate::{RouteResult, SearchEvents, SearchResult, Waypoint, WaypointId};

/// Read-only view of the waypoint set at one revision.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationSnapshot {
    /// Revision the snapshot was taken at.
    pub revision: u64,
    /// Waypoints ordered by index.
    pub waypoints: Rc<[Waypoint]>,
}

impl DestinationSnapshot {
    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[derive(Debug)]
struct Destinations {
    revision: u64,
    next_id: u64,
    waypoints: Rc<[Waypoint]>,
}

#[derive(Debug)]
struct PublishedRoute {
    revision: u64,
    route: RouteResult,
}

/// Waypoints and path for the single active session.
///
/// Components receive a shared handle (usually `Rc<TripState>`) rather than
/// reaching into process-wide state.
///
/// # Examples
/// ```
/// use roamer_core::{SearchResult, TripState};
///
/// let trip = TripState::default();
/// trip.append_result(&SearchResult::new("place.1", "Lyon", 45.76, 4.84));
/// trip.append_point(Some(43.3), Some(5.37), Some("Marseille".to_owned()));
///
/// let snapshot = trip.snapshot();
/// assert_eq!(snapshot.len(), 2);
/// assert_eq!(snapshot.waypoints[1].index, 1);
/// ```
#[derive(Debug)]
pub struct TripState {
    destinations: RefCell<Destinations>,
    route: RefCell<Option<PublishedRoute>>,
}

impl Default for TripState {
    fn default() -> Self {
        Self {
            destinations: RefCell::new(Destinations {
                revision: 0,
                next_id: 1,
                waypoints: Rc::from(Vec::new()),
            }),
            route: RefCell::new(None),
        }
    }
}

impl TripState {
    /// Seed the trip with existing waypoints.
    ///
    /// The waypoints are ordered by `index` and re-indexed `0..n`; fresh ids
    /// continue after the largest supplied id.
    #[must_use]
    pub fn with_waypoints(waypoints: Vec<Waypoint>) -> Self {
        let mut ordered = sort_by_index(&waypoints);
        reindex(&mut ordered);
        let next_id = ordered
            .iter()
            .map(|w| w.id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self {
            destinations: RefCell::new(Destinations {
                revision: 0,
                next_id,
                waypoints: Rc::from(ordered),
            }),
            route: RefCell::new(None),
        }
    }

    /// Current waypoint set.
    pub fn snapshot(&self) -> DestinationSnapshot {
        let destinations = self.destinations.borrow();
        DestinationSnapshot {
            revision: destinations.revision,
            waypoints: Rc::clone(&destinations.waypoints),
        }
    }

    /// Current revision of the waypoint set.
    pub fn revision(&self) -> u64 {
        self.destinations.borrow().revision
    }

    /// Append a waypoint for a selected search result.
    pub fn append_result(&self, result: &SearchResult) -> Waypoint {
        self.append_point(
            Some(result.lat),
            Some(result.lon),
            Some(result.place_name.clone()),
        )
    }

    /// Append a waypoint at the end of the visiting order.
    pub fn append_point(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        label: Option<String>,
    ) -> Waypoint {
        let mut destinations = self.destinations.borrow_mut();
        let waypoint = Waypoint {
            id: WaypointId(destinations.next_id),
            lat,
            lon,
            index: destinations.waypoints.len(),
            label,
        };
        destinations.next_id = destinations.next_id.saturating_add(1);
        let mut next = destinations.waypoints.to_vec();
        next.push(waypoint.clone());
        Self::swap(&mut destinations, next);
        waypoint
    }

    /// Remove the waypoint with `id`, closing the gap in the indices.
    pub fn remove(&self, id: WaypointId) -> Option<Waypoint> {
        let mut destinations = self.destinations.borrow_mut();
        let position = destinations.waypoints.iter().position(|w| w.id == id)?;
        let mut next = destinations.waypoints.to_vec();
        let removed = next.remove(position);
        reindex(&mut next);
        Self::swap(&mut destinations, next);
        Some(removed)
    }

    /// Replace the whole set, provided it is still at `expected_revision`.
    ///
    /// # Errors
    ///
    /// Returns [`ReindexError::SetChanged`] when another change landed since
    /// the caller's snapshot. The set is left untouched in that case.
    pub fn replace_if_current(
        &self,
        expected_revision: u64,
        waypoints: Vec<Waypoint>,
    ) -> Result<DestinationSnapshot, ReindexError> {
        let mut destinations = self.destinations.borrow_mut();
        if destinations.revision != expected_revision {
            return Err(ReindexError::SetChanged {
                expected: expected_revision,
                current: destinations.revision,
            });
        }
        debug_assert!(is_contiguous(&waypoints), "replacement must be indexed 0..n");
        Self::swap(&mut destinations, waypoints);
        Ok(DestinationSnapshot {
            revision: destinations.revision,
            waypoints: Rc::clone(&destinations.waypoints),
        })
    }

    fn swap(destinations: &mut Destinations, waypoints: Vec<Waypoint>) {
        destinations.waypoints = Rc::from(waypoints);
        destinations.revision = destinations.revision.saturating_add(1);
    }

    /// Store `route` if it was computed for the current revision.
    ///
    /// Returns whether the route was published.
    pub fn publish_route(&self, revision: u64, route: RouteResult) -> bool {
        let current = self.revision();
        if current != revision {
            debug!("dropping path computed for revision {revision}; trip is at {current}");
            return false;
        }
        *self.route.borrow_mut() = Some(PublishedRoute { revision, route });
        true
    }

    /// Path for the current order, if one has been published.
    ///
    /// A path published for an older revision is not returned.
    pub fn route(&self) -> Option<RouteResult> {
        let current = self.revision();
        self.route
            .borrow()
            .as_ref()
            .filter(|published| published.revision == current)
            .map(|published| published.route.clone())
    }
}

/// Selection callback that appends the chosen place to a trip.
///
/// # Examples
/// ```
/// use std::rc::Rc;
/// use roamer_core::{DestinationAppender, SearchEvents, SearchResult, TripState};
///
/// let trip = Rc::new(TripState::default());
/// let appender = DestinationAppender::new(Rc::clone(&trip));
/// appender.on_select(&SearchResult::new("place.9", "Nice", 43.7, 7.26));
/// assert_eq!(trip.snapshot().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DestinationAppender {
    trip: Rc<TripState>,
}

impl DestinationAppender {
    /// Append selections to `trip`.
    #[must_use]
    pub const fn new(trip: Rc<TripState>) -> Self {
        Self { trip }
    }
}

impl SearchEvents for DestinationAppender {
    fn on_select(&self, result: &SearchResult) {
        let waypoint = self.trip.append_result(result);
        debug!("appended {} as waypoint {}", result.place_name, waypoint.id);
    }
}
