//! Free-text place search with race-free result handling.
//!
//! [`SearchCoordinator`] turns raw input events into geocoding queries and
//! keeps only the response to the most recently issued query visible. The
//! supporting types describe the query, its results and the issue-time clock
//! used to order requests.

mod coordinator;

use std::cell::Cell;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use coordinator::{PendingSearch, ResponseOutcome, SearchCoordinator, SearchPhase};

/// Default geocoding endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.tiles.mapbox.com";
/// Default geocoding data source.
pub const DEFAULT_SOURCE: &str = "mapbox.places";
/// Default input placeholder.
pub const DEFAULT_PLACEHOLDER: &str = "Search";

/// One candidate place returned by the geocoder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// Provider identifier, such as `place.123`.
    pub id: String,
    /// Display name.
    pub place_name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl SearchResult {
    /// Construct a search result.
    pub fn new(id: impl Into<String>, place_name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            place_name: place_name.into(),
            lat,
            lon,
        }
    }

    /// Position with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// Static search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Geocoding service base URL.
    pub endpoint: String,
    /// Geocoding data source.
    pub source: String,
    /// Opaque access token forwarded to the geocoder.
    pub access_token: String,
    /// Optional `lon,lat` bias; empty when unset.
    pub proximity: String,
    /// Input placeholder; purely presentational.
    pub input_placeholder: String,
}

impl SearchOptions {
    /// Default options using the supplied access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            source: DEFAULT_SOURCE.to_owned(),
            access_token: access_token.into(),
            proximity: String::new(),
            input_placeholder: DEFAULT_PLACEHOLDER.to_owned(),
        }
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the data source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Bias results towards a `lon,lat` position.
    #[must_use]
    pub fn with_proximity(mut self, proximity: impl Into<String>) -> Self {
        self.proximity = proximity.into();
        self
    }

    /// Build the query for `text`.
    #[must_use]
    pub fn query(&self, text: &str) -> SearchQuery {
        SearchQuery {
            endpoint: self.endpoint.clone(),
            source: self.source.clone(),
            access_token: self.access_token.clone(),
            proximity: self.proximity.clone(),
            text: text.to_owned(),
        }
    }
}

/// Arguments of one geocoding call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Geocoding service base URL.
    pub endpoint: String,
    /// Geocoding data source.
    pub source: String,
    /// Opaque access token.
    pub access_token: String,
    /// Optional `lon,lat` bias; empty when unset.
    pub proximity: String,
    /// Text typed by the user.
    pub text: String,
}

/// Moment a search request was issued.
///
/// Only ordering matters; the unit is whatever the [`IssueClock`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssueTime(pub u64);

impl IssueTime {
    /// The next representable instant.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Source of issue times for search requests.
pub trait IssueClock {
    /// Current issue time.
    fn now(&self) -> IssueTime;
}

/// Clock yielding `1, 2, 3, ...`.
#[derive(Debug, Default)]
pub struct SequenceClock {
    last: Cell<u64>,
}

impl IssueClock for SequenceClock {
    fn now(&self) -> IssueTime {
        let next = self.last.get().saturating_add(1);
        self.last.set(next);
        IssueTime(next)
    }
}

/// Keys understood by the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move focus to the previous result.
    Up,
    /// Move focus to the next result.
    Down,
    /// Select the focused result.
    Enter,
    /// Close the panel.
    Escape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_clock_is_strictly_increasing() {
        let clock = SequenceClock::default();
        let first = clock.now();
        let second = clock.now();
        assert!(second > first);
    }

    #[test]
    fn options_default_to_mapbox_places() {
        let options = SearchOptions::new("token");
        let query = options.query("paris");
        assert_eq!(query.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(query.source, DEFAULT_SOURCE);
        assert!(query.proximity.is_empty());
        assert_eq!(query.text, "paris");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn search_results_serialise_with_place_name() {
        let result = SearchResult::new("place.7", "Lyon", 45.76, 4.84);

        let json = serde_json::to_value(&result).expect("serialise");
        assert_eq!(json["place_name"], "Lyon");

        let back: SearchResult = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, result);
    }
}
