//! Callbacks through which the coordinator and the pipeline publish changes.
//!
//! Every method has a no-op default so consumers only implement what they
//! observe. Callbacks run synchronously on the scheduler thread after the
//! corresponding state change has been fully applied.

use std::rc::Rc;

use crate::{PipelineError, RouteResult, SearchResult, ServiceCallError, Waypoint};

/// Observer of [`SearchCoordinator`](crate::SearchCoordinator) activity.
pub trait SearchEvents {
    /// A result was committed by click or Enter.
    fn on_select(&self, result: &SearchResult) {
        let _ = result;
    }

    /// A non-empty result set was accepted and is now visible.
    fn on_suggest(&self, results: &[SearchResult]) {
        let _ = results;
    }

    /// The authoritative request failed.
    fn on_search_error(&self, error: &ServiceCallError) {
        let _ = error;
    }
}

/// Observer of [`RouteOptimizationPipeline`](crate::RouteOptimizationPipeline)
/// activity.
pub trait TripEvents {
    /// The waypoint set was replaced with a reordered copy.
    fn on_destinations_replaced(&self, waypoints: &[Waypoint]) {
        let _ = waypoints;
    }

    /// A new path was published for the current order.
    fn on_route_updated(&self, route: &RouteResult) {
        let _ = route;
    }

    /// An optimisation was refused or failed before reordering.
    fn on_optimization_error(&self, error: &PipelineError) {
        let _ = error;
    }

    /// A path could not be fetched.
    fn on_path_error(&self, error: &PipelineError) {
        let _ = error;
    }
}

impl SearchEvents for () {}

impl TripEvents for () {}

impl<T: SearchEvents + ?Sized> SearchEvents for &T {
    fn on_select(&self, result: &SearchResult) {
        (**self).on_select(result);
    }

    fn on_suggest(&self, results: &[SearchResult]) {
        (**self).on_suggest(results);
    }

    fn on_search_error(&self, error: &ServiceCallError) {
        (**self).on_search_error(error);
    }
}

impl<T: TripEvents + ?Sized> TripEvents for &T {
    fn on_destinations_replaced(&self, waypoints: &[Waypoint]) {
        (**self).on_destinations_replaced(waypoints);
    }

    fn on_route_updated(&self, route: &RouteResult) {
        (**self).on_route_updated(route);
    }

    fn on_optimization_error(&self, error: &PipelineError) {
        (**self).on_optimization_error(error);
    }

    fn on_path_error(&self, error: &PipelineError) {
        (**self).on_path_error(error);
    }
}

impl<T: SearchEvents + ?Sized> SearchEvents for Rc<T> {
    fn on_select(&self, result: &SearchResult) {
        (**self).on_select(result);
    }

    fn on_suggest(&self, results: &[SearchResult]) {
        (**self).on_suggest(results);
    }

    fn on_search_error(&self, error: &ServiceCallError) {
        (**self).on_search_error(error);
    }
}

impl<T: TripEvents + ?Sized> TripEvents for Rc<T> {
    fn on_destinations_replaced(&self, waypoints: &[Waypoint]) {
        (**self).on_destinations_replaced(waypoints);
    }

    fn on_route_updated(&self, route: &RouteResult) {
        (**self).on_route_updated(route);
    }

    fn on_optimization_error(&self, error: &PipelineError) {
        (**self).on_optimization_error(error);
    }

    fn on_path_error(&self, error: &PipelineError) {
        (**self).on_path_error(error);
    }
}
