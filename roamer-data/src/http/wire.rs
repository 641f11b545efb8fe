//! Response payloads of the geocoding, routing and optimisation services.
//!
//! The geocoder speaks the Mapbox Geocoding v5 format. The router answers in
//! the OSRM route format, or with a bare `{ "error": ... }` object. The
//! optimiser answers with `{ "order": [...] }`, optionally with leg costs, or
//! with `{ "error": ... }`.

use geo::{Coord, LineString};
use roamer_core::{
    LegCost, OptimizerResponse, RouteGeometry, RouteResult, SearchResult, ServiceCallError,
};
use serde::Deserialize;

use super::transport::seconds;

/// Code reported for bare `{ "error": ... }` payloads.
const ERROR_PAYLOAD_CODE: &str = "Error";

/// Geocoding response.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// Candidate places, best match first.
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One candidate place.
///
/// Mapbox reports the position as `center: [lon, lat]`; flat `lat`/`lon`
/// fields are accepted as well.
#[derive(Debug, Deserialize)]
pub struct Feature {
    /// Provider identifier.
    pub id: String,
    /// Display name.
    pub place_name: String,
    /// `[lon, lat]` pair.
    pub center: Option<[f64; 2]>,
    /// Latitude, when reported flat.
    pub lat: Option<f64>,
    /// Longitude, when reported flat.
    pub lon: Option<f64>,
}

impl Feature {
    fn into_result(self) -> Result<SearchResult, ServiceCallError> {
        let (lon, lat) = match (self.center, self.lon, self.lat) {
            (Some([lon, lat]), _, _) | (None, Some(lon), Some(lat)) => (lon, lat),
            _ => {
                return Err(ServiceCallError::Parse {
                    message: format!("feature {} has no position", self.id),
                });
            }
        };
        Ok(SearchResult::new(self.id, self.place_name, lat, lon))
    }
}

impl GeocodeResponse {
    /// Convert the payload into search results.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceCallError::Parse`] when a feature carries no position.
    pub fn into_results(self) -> Result<Vec<SearchResult>, ServiceCallError> {
        self.features.into_iter().map(Feature::into_result).collect()
    }
}

/// Path-routing response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// OSRM status code; `"Ok"` on success.
    pub code: Option<String>,
    /// Error message accompanying a non-`Ok` code.
    pub message: Option<String>,
    /// Bare error payload.
    pub error: Option<String>,
    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// One computed route.
#[derive(Debug, Deserialize)]
pub struct RouteEntry {
    /// Encoded polyline or GeoJSON line.
    pub geometry: Option<WireGeometry>,
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// Route geometry as sent by the router.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireGeometry {
    /// Encoded polyline.
    Encoded(String),
    /// GeoJSON `LineString`.
    GeoJson {
        /// `[lon, lat]` pairs.
        coordinates: Vec<[f64; 2]>,
    },
}

impl From<WireGeometry> for RouteGeometry {
    fn from(geometry: WireGeometry) -> Self {
        match geometry {
            WireGeometry::Encoded(polyline) => Self::Polyline(polyline),
            WireGeometry::GeoJson { coordinates } => Self::Line(LineString::new(
                coordinates
                    .into_iter()
                    .map(|[x, y]| Coord { x, y })
                    .collect(),
            )),
        }
    }
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.code.as_deref().is_none_or(|code| code == "Ok")
    }

    /// Convert the best route into a [`RouteResult`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceCallError::Rejected`] for error payloads and
    /// [`ServiceCallError::Parse`] when no usable route is present.
    pub fn into_route(self) -> Result<RouteResult, ServiceCallError> {
        if !self.is_ok() {
            return Err(match self.error {
                Some(message) => ServiceCallError::Rejected {
                    code: ERROR_PAYLOAD_CODE.to_owned(),
                    message,
                },
                None => ServiceCallError::Rejected {
                    code: self.code.unwrap_or_default(),
                    message: self.message.unwrap_or_default(),
                },
            });
        }
        let entry = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ServiceCallError::Parse {
                message: "route response contains no routes".to_owned(),
            })?;
        let route = RouteResult::new(entry.distance, seconds(entry.duration, "duration")?);
        Ok(match entry.geometry {
            Some(geometry) => route.with_geometry(geometry.into()),
            None => route,
        })
    }
}

/// Order-optimisation response.
#[derive(Debug, Deserialize)]
pub struct OptimizeResponse {
    /// Proposed permutation.
    pub order: Option<Vec<usize>>,
    /// Per-leg costs in visiting order.
    #[serde(default)]
    pub legs: Vec<WireLeg>,
    /// Bare error payload.
    pub error: Option<String>,
}

/// Cost of one leg.
#[derive(Debug, Deserialize)]
pub struct WireLeg {
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl OptimizeResponse {
    /// Convert the payload into an [`OptimizerResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceCallError::Rejected`] for error payloads and
    /// [`ServiceCallError::Parse`] when the order is missing.
    pub fn into_response(self) -> Result<OptimizerResponse, ServiceCallError> {
        if let Some(message) = self.error {
            return Err(ServiceCallError::Rejected {
                code: ERROR_PAYLOAD_CODE.to_owned(),
                message,
            });
        }
        let order = self.order.ok_or_else(|| ServiceCallError::Parse {
            message: "optimisation response contains no order".to_owned(),
        })?;
        let legs = self
            .legs
            .into_iter()
            .map(|leg| {
                Ok(LegCost {
                    distance: leg.distance,
                    duration: seconds(leg.duration, "leg duration")?,
                })
            })
            .collect::<Result<_, ServiceCallError>>()?;
        Ok(OptimizerResponse { order, legs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    fn mapbox_features_use_center_as_lon_lat() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"id": "place.1", "place_name": "Paris, France", "center": [2.35, 48.85]}
            ]
        }"#;
        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        let results = response.into_results().expect("positions present");

        assert_eq!(results, vec![SearchResult::new("place.1", "Paris, France", 48.85, 2.35)]);
    }

    #[rstest]
    fn flat_coordinates_are_accepted() {
        let json = r#"{"features": [{"id": "a", "place_name": "A", "lat": 1.5, "lon": 2.5}]}"#;
        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        let results = response.into_results().expect("positions present");

        assert_eq!(results[0].lat, 1.5);
        assert_eq!(results[0].lon, 2.5);
    }

    #[rstest]
    fn feature_without_position_is_a_parse_error() {
        let json = r#"{"features": [{"id": "a", "place_name": "A"}]}"#;
        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        let err = response.into_results().expect_err("no position");

        assert!(matches!(err, ServiceCallError::Parse { .. }));
    }

    #[rstest]
    fn osrm_route_with_polyline() {
        let json = r#"{
            "code": "Ok",
            "routes": [{"geometry": "_p~iF~ps|U", "distance": 1520.4, "duration": 300.0}]
        }"#;
        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(response.is_ok());

        let route = response.into_route().expect("route present");

        assert_eq!(route.distance, 1520.4);
        assert_eq!(route.duration, Duration::from_secs(300));
        assert_eq!(
            route.geometry,
            Some(RouteGeometry::Polyline("_p~iF~ps|U".to_owned()))
        );
    }

    #[rstest]
    fn geojson_geometry_becomes_a_line() {
        let json = r#"{
            "routes": [{
                "geometry": {"type": "LineString", "coordinates": [[2.0, 1.0], [4.0, 3.0]]},
                "distance": 10.0,
                "duration": 2.0
            }]
        }"#;
        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        let route = response.into_route().expect("route present");

        let Some(RouteGeometry::Line(line)) = route.geometry else {
            panic!("expected a decoded line");
        };
        assert_eq!(line.0, vec![Coord { x: 2.0, y: 1.0 }, Coord { x: 4.0, y: 3.0 }]);
    }

    #[rstest]
    #[case(r#"{"error": "no route"}"#, "Error", "no route")]
    #[case(r#"{"code": "NoRoute", "message": "Impossible route"}"#, "NoRoute", "Impossible route")]
    fn route_error_payloads_are_rejections(
        #[case] json: &str,
        #[case] expected_code: &str,
        #[case] expected_message: &str,
    ) {
        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(!response.is_ok());

        let err = response.into_route().expect_err("error payload");

        assert_eq!(
            err,
            ServiceCallError::Rejected {
                code: expected_code.to_owned(),
                message: expected_message.to_owned(),
            }
        );
    }

    #[rstest]
    fn empty_route_list_is_a_parse_error() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).expect("should deserialise");

        assert!(matches!(
            response.into_route(),
            Err(ServiceCallError::Parse { .. })
        ));
    }

    #[rstest]
    fn optimiser_order_with_legs() {
        let json = r#"{"order": [2, 0, 1], "legs": [{"distance": 5.0, "duration": 1.5}]}"#;
        let response: OptimizeResponse = serde_json::from_str(json).expect("should deserialise");

        let optimised = response.into_response().expect("order present");

        assert_eq!(optimised.order, vec![2, 0, 1]);
        assert_eq!(optimised.legs[0].duration, Duration::from_millis(1500));
    }

    #[rstest]
    #[case(r#"{"error": "solver unavailable"}"#)]
    #[case(r#"{"order": [0, 1], "error": "partial"}"#)]
    fn optimiser_errors_take_precedence(#[case] json: &str) {
        let response: OptimizeResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(matches!(
            response.into_response(),
            Err(ServiceCallError::Rejected { .. })
        ));
    }

    #[rstest]
    fn optimiser_without_order_is_a_parse_error() {
        let response: OptimizeResponse = serde_json::from_str("{}").expect("should deserialise");

        assert!(matches!(
            response.into_response(),
            Err(ServiceCallError::Parse { .. })
        ));
    }
}
