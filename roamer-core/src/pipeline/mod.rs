//! Optimise the visiting order of a trip and refresh its path.
//!
//! [`RouteOptimizationPipeline`] runs two sequential service calls: the
//! optimiser proposes a permutation, the reordered set replaces the trip's
//! waypoints in one swap, and only then is the path fetched for the new
//! order. Failures are reported through [`TripEvents`] and returned to the
//! caller; nothing is retried here.

mod error;

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::ordering::{apply_permutation, coordinate_query};
use crate::{
    DestinationSnapshot, OrderOptimizer, PathRouter, RouteResult, SolverParams, TripEvents,
    TripState, Waypoint,
};

pub use error::PipelineError;

/// Outcome of a fully successful optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedTrip {
    /// Waypoints in their new visiting order.
    pub waypoints: Vec<Waypoint>,
    /// Path through the new order.
    pub route: RouteResult,
}

/// Marks an optimisation as in flight until dropped.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Orchestrates optimiser and router calls against a shared trip.
///
/// # Examples
/// ```
/// use std::rc::Rc;
/// use roamer_core::test_support::{StubOrderOptimizer, StubPathRouter};
/// use roamer_core::{RouteOptimizationPipeline, SolverParams, TripState};
///
/// let trip = Rc::new(TripState::default());
/// trip.append_point(Some(1.0), Some(1.0), None);
/// trip.append_point(Some(2.0), Some(2.0), None);
/// trip.append_point(Some(3.0), Some(3.0), None);
///
/// let pipeline = RouteOptimizationPipeline::new(
///     StubPathRouter::default(),
///     StubOrderOptimizer::returning_order(vec![2, 0, 1]),
///     Rc::clone(&trip),
///     (),
/// );
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let optimised = runtime.block_on(pipeline.optimize(&SolverParams::new("tsp", "driving")))?;
///
/// let ids: Vec<u64> = optimised.waypoints.iter().map(|w| w.id.0).collect();
/// assert_eq!(ids, vec![3, 1, 2]);
/// assert_eq!(trip.route(), Some(optimised.route));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RouteOptimizationPipeline<R, O, E> {
    router: R,
    optimizer: O,
    trip: Rc<TripState>,
    events: E,
    in_flight: Cell<bool>,
}

impl<R, O, E> RouteOptimizationPipeline<R, O, E>
where
    R: PathRouter,
    O: OrderOptimizer,
    E: TripEvents,
{
    /// Construct a pipeline operating on `trip`.
    pub const fn new(router: R, optimizer: O, trip: Rc<TripState>, events: E) -> Self {
        Self {
            router,
            optimizer,
            trip,
            events,
            in_flight: Cell::new(false),
        }
    }

    /// Trip the pipeline reads and updates.
    pub const fn trip(&self) -> &Rc<TripState> {
        &self.trip
    }

    /// Whether an optimisation is currently awaiting a service.
    pub fn is_optimizing(&self) -> bool {
        self.in_flight.get()
    }

    /// Reorder the trip using the external optimiser, then refresh its path.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::OptimizationInFlight`] when another call is pending.
    /// - [`PipelineError::NotEnoughWaypoints`] for fewer than two waypoints;
    ///   no service is called.
    /// - [`PipelineError::Optimization`] or [`PipelineError::Reindex`] when
    ///   the optimiser fails or its order cannot be applied; the trip is
    ///   left unchanged.
    /// - [`PipelineError::PathFetch`] when the path cannot be fetched; the
    ///   new order has already been published and stays in place.
    pub async fn optimize(&self, params: &SolverParams) -> Result<OptimizedTrip, PipelineError> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return Err(self.optimization_failed(PipelineError::OptimizationInFlight));
        };

        let snapshot = self.trip.snapshot();
        if snapshot.len() < 2 {
            return Err(self.optimization_failed(PipelineError::NotEnoughWaypoints {
                count: snapshot.len(),
            }));
        }

        let query = coordinate_query(&snapshot.waypoints);
        debug!(
            "optimising {} waypoints with solver {} ({})",
            query.len(),
            params.solver,
            params.profile
        );
        let response = match self.optimizer.optimize(&query, params).await {
            Ok(response) => response,
            Err(source) => {
                return Err(self.optimization_failed(PipelineError::Optimization { source }));
            }
        };

        let replaced = apply_permutation(&snapshot.waypoints, &response.order)
            .and_then(|reordered| self.trip.replace_if_current(snapshot.revision, reordered))
            .map_err(|source| self.optimization_failed(PipelineError::Reindex { source }))?;
        info!(
            "published optimised order for {} waypoints at revision {}",
            replaced.len(),
            replaced.revision
        );
        self.events.on_destinations_replaced(&replaced.waypoints);

        let route = self.fetch_path_for(&replaced).await?;
        Ok(OptimizedTrip {
            waypoints: replaced.waypoints.to_vec(),
            route,
        })
    }

    /// Fetch and publish the path for the trip's current order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PathFetch`] when the router fails.
    pub async fn refresh_path(&self) -> Result<RouteResult, PipelineError> {
        let snapshot = self.trip.snapshot();
        self.fetch_path_for(&snapshot).await
    }

    /// Fetch the path visiting `snapshot` in index order.
    ///
    /// Waypoints without coordinates are left out of the query. The route is
    /// published only when the trip is still at the snapshot's revision; it
    /// is returned either way.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PathFetch`] when the router fails.
    pub async fn fetch_path_for(
        &self,
        snapshot: &DestinationSnapshot,
    ) -> Result<RouteResult, PipelineError> {
        let query = coordinate_query(&snapshot.waypoints);
        match self.router.fetch_route(&query).await {
            Ok(route) => {
                if self.trip.publish_route(snapshot.revision, route.clone()) {
                    self.events.on_route_updated(&route);
                }
                Ok(route)
            }
            Err(source) => {
                let error = PipelineError::PathFetch { source };
                warn!("{error}");
                self.events.on_path_error(&error);
                Err(error)
            }
        }
    }

    fn optimization_failed(&self, error: PipelineError) -> PipelineError {
        warn!("{error}");
        self.events.on_optimization_error(&error);
        error
    }
}
