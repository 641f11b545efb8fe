//! Results returned by the path-routing and order-optimisation services.

use std::time::Duration;

use geo::LineString;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of a computed path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum RouteGeometry {
    /// Encoded polyline as returned verbatim by the router.
    Polyline(String),
    /// Decoded line in `x = longitude`, `y = latitude` order.
    Line(LineString<f64>),
}

/// Path through the current waypoint order.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use roamer_core::RouteResult;
///
/// let route = RouteResult::new(1200.0, Duration::from_secs(300));
/// assert!(route.geometry.is_none());
/// assert_eq!(route.duration.as_secs(), 300);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteResult {
    /// Path geometry, when the router supplied one.
    pub geometry: Option<RouteGeometry>,
    /// Total distance in metres.
    pub distance: f64,
    /// Total travel time.
    pub duration: Duration,
}

impl RouteResult {
    /// Construct a route without geometry.
    #[must_use]
    pub const fn new(distance: f64, duration: Duration) -> Self {
        Self {
            geometry: None,
            distance,
            duration,
        }
    }

    /// Attach a geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: RouteGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// Selects the external solver and travel profile for an optimisation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverParams {
    /// Solver name appended to the optimiser URL path.
    pub solver: String,
    /// Travel profile such as `driving` or `walking`.
    pub profile: String,
}

impl SolverParams {
    /// Construct solver parameters.
    pub fn new(solver: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            solver: solver.into(),
            profile: profile.into(),
        }
    }
}

/// Cost of travelling one leg of the optimised order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegCost {
    /// Leg distance in metres.
    pub distance: f64,
    /// Leg travel time.
    pub duration: Duration,
}

/// Visiting order proposed by the optimiser.
///
/// `order[k]` is the prior position (among located waypoints) of the waypoint
/// that should be visited k-th.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizerResponse {
    /// Permutation of `0..n`.
    pub order: Vec<usize>,
    /// Optional per-leg costs in visiting order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub legs: Vec<LegCost>,
}

impl OptimizerResponse {
    /// Construct a response carrying only a permutation.
    #[must_use]
    pub const fn from_order(order: Vec<usize>) -> Self {
        Self {
            order,
            legs: Vec::new(),
        }
    }
}
