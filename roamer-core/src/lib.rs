//! Core coordination logic for the Roamer trip planner.
//!
//! Two components share one injected [`TripState`]:
//!
//! - [`SearchCoordinator`] turns keystrokes into geocoding queries and keeps
//!   only the newest response visible, with keyboard and pointer selection.
//! - [`RouteOptimizationPipeline`] asks an external solver for a better
//!   visiting order, swaps the reordered waypoints in atomically and then
//!   fetches the path for the new order.
//!
//! The external services sit behind the [`Geocoder`], [`PathRouter`] and
//! [`OrderOptimizer`] traits. Everything here runs on a single cooperative
//! scheduler; state is held in `RefCell`s that are never borrowed across an
//! `.await`.

#![forbid(unsafe_code)]

mod events;
mod ordering;
mod pipeline;
mod route;
mod search;
mod service;
mod trip;
mod waypoint;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use events::{SearchEvents, TripEvents};
pub use ordering::{
    CoordinateQuery, ReindexError, apply_permutation, coordinate_query, is_contiguous, reindex,
    sort_by_index,
};
pub use pipeline::{OptimizedTrip, PipelineError, RouteOptimizationPipeline};
pub use route::{LegCost, OptimizerResponse, RouteGeometry, RouteResult, SolverParams};
pub use search::{
    DEFAULT_ENDPOINT, DEFAULT_PLACEHOLDER, DEFAULT_SOURCE, IssueClock, IssueTime, Key,
    PendingSearch, ResponseOutcome, SearchCoordinator, SearchOptions, SearchPhase, SearchQuery,
    SearchResult, SequenceClock,
};
pub use service::{Geocoder, OrderOptimizer, PathRouter, ServiceCallError};
pub use trip::{DestinationAppender, DestinationSnapshot, TripState};
pub use waypoint::{Waypoint, WaypointId};
