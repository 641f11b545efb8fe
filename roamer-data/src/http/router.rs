//! Path-routing client.

use async_trait::async_trait;
use reqwest::Client;
use roamer_core::{CoordinateQuery, PathRouter, RouteResult, ServiceCallError};
use url::Url;

use super::config::{ClientBuildError, HttpServiceConfig, parse_base_url};
use super::transport::get_json;
use super::wire::RouteResponse;

/// Router issuing `GET {route_url}?coordinates=lon,lat;lon,lat;...`.
///
/// The coordinate list is sent verbatim, including an empty list for
/// degenerate trips; the router's answer is passed through.
#[derive(Debug, Clone)]
pub struct HttpPathRouter {
    client: Client,
    base_url: Url,
    config: HttpServiceConfig,
}

impl HttpPathRouter {
    /// Create a router for `route_url` with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client fails to build.
    pub fn new(route_url: &str) -> Result<Self, ClientBuildError> {
        Self::with_config(route_url, HttpServiceConfig::default())
    }

    /// Create a router with explicit transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client fails to build.
    pub fn with_config(
        route_url: &str,
        config: HttpServiceConfig,
    ) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: config.build_client()?,
            base_url: parse_base_url(route_url)?,
            config,
        })
    }

    fn build_route_url(&self, coordinates: &CoordinateQuery) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&format!("coordinates={coordinates}")));
        url
    }
}

#[async_trait(?Send)]
impl PathRouter for HttpPathRouter {
    async fn fetch_route(
        &self,
        coordinates: &CoordinateQuery,
    ) -> Result<RouteResult, ServiceCallError> {
        let url = self.build_route_url(coordinates);
        let response: RouteResponse = get_json(&self.client, &url, self.config.timeout).await?;
        response.into_route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamer_core::{Waypoint, WaypointId, coordinate_query};
    use rstest::rstest;

    #[rstest]
    fn route_url_keeps_coordinate_separators() {
        let router = HttpPathRouter::new("http://router.example.com/route/v1/driving")
            .expect("router should build");
        let query = coordinate_query(&[
            Waypoint::new(WaypointId(1), 51.5, -0.1, 0),
            Waypoint::new(WaypointId(2), 51.6, -0.2, 1),
        ]);

        let url = router.build_route_url(&query);

        assert_eq!(
            url.as_str(),
            "http://router.example.com/route/v1/driving?coordinates=-0.1,51.5;-0.2,51.6"
        );
    }

    #[rstest]
    fn empty_trip_sends_empty_coordinates() {
        let router = HttpPathRouter::new("http://router.example.com/route").expect("router");

        let url = router.build_route_url(&coordinate_query(&[]));

        assert_eq!(url.query(), Some("coordinates="));
    }

    #[rstest]
    fn invalid_route_url_is_rejected() {
        let err = HttpPathRouter::new("router").expect_err("relative URL");
        assert!(matches!(err, ClientBuildError::InvalidUrl { .. }));
    }
}
