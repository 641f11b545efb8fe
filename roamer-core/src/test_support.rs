//! Scripted service doubles and recording observers for unit and behaviour
//! tests.
//!
//! Services answer from a script and record every query they receive. Each
//! one can be gated on a [`oneshot`] receiver so a test decides when a
//! response "arrives", which makes out-of-order completion deterministic on a
//! single-threaded runtime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    CoordinateQuery, Geocoder, OptimizerResponse, OrderOptimizer, PathRouter, PipelineError,
    RouteResult, SearchEvents, SearchQuery, SearchResult, ServiceCallError, SolverParams,
    TripEvents, Waypoint,
};

type Gate = RefCell<Option<oneshot::Receiver<()>>>;

async fn wait_for(gate: &Gate) {
    let receiver = gate.borrow_mut().take();
    if let Some(receiver) = receiver {
        // A dropped sender releases the gate as well.
        let _released = receiver.await;
    }
}

/// Geocoder answering from a per-text script.
///
/// Unscripted texts yield an empty result list.
#[derive(Debug, Default)]
pub struct ScriptedGeocoder {
    script: HashMap<String, Result<Vec<SearchResult>, ServiceCallError>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    queries: RefCell<Vec<String>>,
}

impl ScriptedGeocoder {
    /// Answer `text` with `results`.
    #[must_use]
    pub fn with_results(mut self, text: &str, results: Vec<SearchResult>) -> Self {
        self.script.insert(text.to_owned(), Ok(results));
        self
    }

    /// Answer `text` with `error`.
    #[must_use]
    pub fn with_error(mut self, text: &str, error: ServiceCallError) -> Self {
        self.script.insert(text.to_owned(), Err(error));
        self
    }

    /// Hold the answer for `text` until `release` fires.
    #[must_use]
    pub fn with_gate(self, text: &str, release: oneshot::Receiver<()>) -> Self {
        self.gates.borrow_mut().insert(text.to_owned(), release);
        self
    }

    /// Texts searched so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Geocoder for ScriptedGeocoder {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ServiceCallError> {
        self.queries.borrow_mut().push(query.text.clone());
        let gate = self.gates.borrow_mut().remove(&query.text);
        if let Some(release) = gate {
            let _released = release.await;
        }
        self.script
            .get(&query.text)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Router returning the same outcome for every query.
#[derive(Debug)]
pub struct StubPathRouter {
    outcome: Result<RouteResult, ServiceCallError>,
    gate: Gate,
    queries: RefCell<Vec<String>>,
}

impl Default for StubPathRouter {
    fn default() -> Self {
        Self::returning(RouteResult::new(1000.0, Duration::from_secs(60)))
    }
}

impl StubPathRouter {
    /// Answer every query with `route`.
    #[must_use]
    pub const fn returning(route: RouteResult) -> Self {
        Self::with_outcome(Ok(route))
    }

    /// Fail every query with `error`.
    #[must_use]
    pub const fn failing(error: ServiceCallError) -> Self {
        Self::with_outcome(Err(error))
    }

    const fn with_outcome(outcome: Result<RouteResult, ServiceCallError>) -> Self {
        Self {
            outcome,
            gate: RefCell::new(None),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Hold the first answer until `release` fires.
    #[must_use]
    pub fn with_gate(self, release: oneshot::Receiver<()>) -> Self {
        *self.gate.borrow_mut() = Some(release);
        self
    }

    /// Coordinate queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PathRouter for StubPathRouter {
    async fn fetch_route(
        &self,
        coordinates: &CoordinateQuery,
    ) -> Result<RouteResult, ServiceCallError> {
        self.queries.borrow_mut().push(coordinates.to_string());
        wait_for(&self.gate).await;
        self.outcome.clone()
    }
}

/// Optimiser returning the same outcome for every query.
#[derive(Debug)]
pub struct StubOrderOptimizer {
    outcome: Result<OptimizerResponse, ServiceCallError>,
    gate: Gate,
    queries: RefCell<Vec<String>>,
    params: RefCell<Vec<SolverParams>>,
}

impl StubOrderOptimizer {
    /// Answer every query with `order`.
    #[must_use]
    pub const fn returning_order(order: Vec<usize>) -> Self {
        Self::with_outcome(Ok(OptimizerResponse::from_order(order)))
    }

    /// Fail every query with `error`.
    #[must_use]
    pub const fn failing(error: ServiceCallError) -> Self {
        Self::with_outcome(Err(error))
    }

    const fn with_outcome(outcome: Result<OptimizerResponse, ServiceCallError>) -> Self {
        Self {
            outcome,
            gate: RefCell::new(None),
            queries: RefCell::new(Vec::new()),
            params: RefCell::new(Vec::new()),
        }
    }

    /// Hold the first answer until `release` fires.
    #[must_use]
    pub fn with_gate(self, release: oneshot::Receiver<()>) -> Self {
        *self.gate.borrow_mut() = Some(release);
        self
    }

    /// Coordinate queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    /// Solver parameters received so far.
    pub fn params(&self) -> Vec<SolverParams> {
        self.params.borrow().clone()
    }
}

#[async_trait(?Send)]
impl OrderOptimizer for StubOrderOptimizer {
    async fn optimize(
        &self,
        coordinates: &CoordinateQuery,
        params: &SolverParams,
    ) -> Result<OptimizerResponse, ServiceCallError> {
        self.queries.borrow_mut().push(coordinates.to_string());
        self.params.borrow_mut().push(params.clone());
        wait_for(&self.gate).await;
        self.outcome.clone()
    }
}

/// [`SearchEvents`] observer recording every callback.
#[derive(Debug, Default)]
pub struct RecordingSearchEvents {
    selections: RefCell<Vec<SearchResult>>,
    suggestions: RefCell<Vec<Vec<SearchResult>>>,
    errors: RefCell<Vec<ServiceCallError>>,
}

impl RecordingSearchEvents {
    /// Results passed to `on_select`.
    pub fn selections(&self) -> Vec<SearchResult> {
        self.selections.borrow().clone()
    }

    /// Result lists passed to `on_suggest`.
    pub fn suggestions(&self) -> Vec<Vec<SearchResult>> {
        self.suggestions.borrow().clone()
    }

    /// Errors passed to `on_search_error`.
    pub fn errors(&self) -> Vec<ServiceCallError> {
        self.errors.borrow().clone()
    }
}

impl SearchEvents for RecordingSearchEvents {
    fn on_select(&self, result: &SearchResult) {
        self.selections.borrow_mut().push(result.clone());
    }

    fn on_suggest(&self, results: &[SearchResult]) {
        self.suggestions.borrow_mut().push(results.to_vec());
    }

    fn on_search_error(&self, error: &ServiceCallError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

/// [`TripEvents`] observer recording every callback.
#[derive(Debug, Default)]
pub struct RecordingTripEvents {
    replaced: RefCell<Vec<Vec<Waypoint>>>,
    routes: RefCell<Vec<RouteResult>>,
    optimization_errors: RefCell<Vec<PipelineError>>,
    path_errors: RefCell<Vec<PipelineError>>,
}

impl RecordingTripEvents {
    /// Waypoint sets passed to `on_destinations_replaced`.
    pub fn replaced(&self) -> Vec<Vec<Waypoint>> {
        self.replaced.borrow().clone()
    }

    /// Routes passed to `on_route_updated`.
    pub fn routes(&self) -> Vec<RouteResult> {
        self.routes.borrow().clone()
    }

    /// Errors passed to `on_optimization_error`.
    pub fn optimization_errors(&self) -> Vec<PipelineError> {
        self.optimization_errors.borrow().clone()
    }

    /// Errors passed to `on_path_error`.
    pub fn path_errors(&self) -> Vec<PipelineError> {
        self.path_errors.borrow().clone()
    }
}

impl TripEvents for RecordingTripEvents {
    fn on_destinations_replaced(&self, waypoints: &[Waypoint]) {
        self.replaced.borrow_mut().push(waypoints.to_vec());
    }

    fn on_route_updated(&self, route: &RouteResult) {
        self.routes.borrow_mut().push(route.clone());
    }

    fn on_optimization_error(&self, error: &PipelineError) {
        self.optimization_errors.borrow_mut().push(error.clone());
    }

    fn on_path_error(&self, error: &PipelineError) {
        self.path_errors.borrow_mut().push(error.clone());
    }
}
