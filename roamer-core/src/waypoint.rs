use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier assigned to a waypoint when it joins a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct WaypointId(pub u64);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-selected point participating in the route.
///
/// Coordinates are WGS84 degrees. Either coordinate may be missing, in which
/// case the waypoint keeps its slot in the visiting order but is left out of
/// every coordinate query sent to the routing services.
///
/// # Examples
/// ```
/// use roamer_core::{Waypoint, WaypointId};
///
/// let waypoint = Waypoint::new(WaypointId(7), 51.5, -0.1, 0);
/// assert!(waypoint.is_located());
/// assert_eq!(waypoint.lon_lat(), Some((-0.1, 51.5)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// Stable identifier within the trip.
    pub id: WaypointId,
    /// Latitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lon: Option<f64>,
    /// Position in the visiting order.
    pub index: usize,
    /// Human readable name, usually the selected place name.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label: Option<String>,
}

impl Waypoint {
    /// Construct a located waypoint without a label.
    #[must_use]
    pub const fn new(id: WaypointId, lat: f64, lon: f64, index: usize) -> Self {
        Self {
            id,
            lat: Some(lat),
            lon: Some(lon),
            index,
            label: None,
        }
    }

    /// Construct a waypoint whose coordinates are not known yet.
    #[must_use]
    pub const fn unlocated(id: WaypointId, index: usize) -> Self {
        Self {
            id,
            lat: None,
            lon: None,
            index,
            label: None,
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether both coordinates are present.
    #[must_use]
    pub const fn is_located(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    /// Return `(lon, lat)` when both coordinates are present.
    #[must_use]
    pub const fn lon_lat(&self) -> Option<(f64, f64)> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }
}
