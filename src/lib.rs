//! Facade crate for the Roamer trip planner.
//!
//! This crate re-exports the core coordination types and, behind the default
//! `http` feature, the `reqwest`-backed service clients.

#![forbid(unsafe_code)]

pub use roamer_core::{
    DestinationAppender, DestinationSnapshot, Geocoder, IssueClock, IssueTime, Key, LegCost,
    OptimizedTrip, OptimizerResponse, OrderOptimizer, PathRouter, PendingSearch, PipelineError,
    ReindexError, ResponseOutcome, RouteGeometry, RouteOptimizationPipeline, RouteResult,
    SearchCoordinator, SearchEvents, SearchOptions, SearchPhase, SearchQuery, SearchResult,
    SequenceClock, ServiceCallError, SolverParams, TripEvents, TripState, Waypoint, WaypointId,
    apply_permutation, coordinate_query, sort_by_index,
};

#[cfg(feature = "http")]
pub use roamer_data::http::{
    ClientBuildError, HttpGeocoder, HttpOrderOptimizer, HttpPathRouter, HttpServiceConfig,
};

#[cfg(feature = "test-support")]
pub use roamer_core::test_support;
