//! Boundaries to the external services.
//!
//! The geocoder, path router and order optimiser are black boxes that answer
//! with a payload or a [`ServiceCallError`]. Implementations live outside this
//! crate; `roamer-data` provides HTTP clients and the `test-support` feature
//! provides scripted doubles.
//!
//! The traits are `?Send`: every component runs on one cooperative
//! scheduler, so futures never cross threads.

mod error;

use async_trait::async_trait;

use crate::{
    CoordinateQuery, OptimizerResponse, RouteResult, SearchQuery, SearchResult, SolverParams,
};

pub use error::ServiceCallError;

/// Free-text place lookup.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Return the candidate places matching `query.text`.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ServiceCallError>;
}

/// Travel path through an ordered list of coordinates.
#[async_trait(?Send)]
pub trait PathRouter {
    /// Compute the path visiting `coordinates` in order.
    ///
    /// Degenerate queries (zero or one coordinate) are forwarded unchanged;
    /// whatever the router answers is returned.
    async fn fetch_route(
        &self,
        coordinates: &CoordinateQuery,
    ) -> Result<RouteResult, ServiceCallError>;
}

/// External solver proposing a visiting order.
#[async_trait(?Send)]
pub trait OrderOptimizer {
    /// Return a permutation of the coordinates in `coordinates`.
    async fn optimize(
        &self,
        coordinates: &CoordinateQuery,
        params: &SolverParams,
    ) -> Result<OptimizerResponse, ServiceCallError>;
}

#[async_trait(?Send)]
impl<T: Geocoder + ?Sized> Geocoder for &T {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ServiceCallError> {
        (**self).search(query).await
    }
}

#[async_trait(?Send)]
impl<T: PathRouter + ?Sized> PathRouter for &T {
    async fn fetch_route(
        &self,
        coordinates: &CoordinateQuery,
    ) -> Result<RouteResult, ServiceCallError> {
        (**self).fetch_route(coordinates).await
    }
}

#[async_trait(?Send)]
impl<T: OrderOptimizer + ?Sized> OrderOptimizer for &T {
    async fn optimize(
        &self,
        coordinates: &CoordinateQuery,
        params: &SolverParams,
    ) -> Result<OptimizerResponse, ServiceCallError> {
        (**self).optimize(coordinates, params).await
    }
}
