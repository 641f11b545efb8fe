use thiserror::Error;

use crate::{ReindexError, ServiceCallError};

/// Errors raised by [`RouteOptimizationPipeline`](super::RouteOptimizationPipeline).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Fewer than two waypoints were available; no request was sent.
    #[error("optimisation needs at least two waypoints, found {count}")]
    NotEnoughWaypoints {
        /// Waypoints in the trip when the optimisation was requested.
        count: usize,
    },
    /// Another optimisation is still in flight.
    #[error("an optimisation is already in progress")]
    OptimizationInFlight,
    /// The optimiser failed; the waypoint set is unchanged.
    #[error("optimisation failed: {source}")]
    Optimization {
        /// Underlying service failure.
        #[source]
        source: ServiceCallError,
    },
    /// The optimiser answered with an order that does not fit the waypoints.
    #[error("optimised order could not be applied: {source}")]
    Reindex {
        /// Why the permutation was refused.
        #[source]
        source: ReindexError,
    },
    /// The path could not be fetched; any reorder already applied stands.
    #[error("path fetch failed: {source}")]
    PathFetch {
        /// Underlying service failure.
        #[source]
        source: ServiceCallError,
    },
}

impl PipelineError {
    /// Whether the failure happened before the waypoint set was touched.
    #[must_use]
    pub const fn left_order_unchanged(&self) -> bool {
        !matches!(self, Self::PathFetch { .. })
    }
}
