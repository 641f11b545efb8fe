//! Test helpers: scripted service builders and waypoint files on disk.

use super::*;
use crate::services::ServiceBuilder;
use camino::{Utf8Path, Utf8PathBuf};
use roamer_core::test_support::{ScriptedGeocoder, StubOrderOptimizer, StubPathRouter};
use roamer_core::{
    Geocoder, OrderOptimizer, PathRouter, RouteResult, SearchResult, ServiceCallError, Waypoint,
    WaypointId,
};
use roamer_data::http::HttpServiceConfig;
use std::cell::RefCell;
use std::time::Duration;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn temp_root() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn located_waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint::new(WaypointId(1), 45.76, 4.84, 0).with_label("Bellecour"),
        Waypoint::new(WaypointId(2), 45.75, 4.85, 1).with_label("Perrache"),
        Waypoint::new(WaypointId(3), 45.77, 4.83, 2).with_label("Croix-Rousse"),
    ]
}

pub(super) fn write_waypoints(path: &Utf8Path, waypoints: &[Waypoint]) {
    let payload = serde_json::to_string_pretty(waypoints).expect("serialize waypoints");
    write_utf8(path, payload.as_bytes());
}

pub(super) fn default_route() -> RouteResult {
    RouteResult::new(1500.0, Duration::from_secs(420))
}

/// Builds scripted services in place of the HTTP clients.
#[derive(Debug)]
pub(super) struct StubServices {
    pub(super) places: Vec<(String, Vec<SearchResult>)>,
    pub(super) search_failure: Option<(String, ServiceCallError)>,
    pub(super) route: Result<RouteResult, ServiceCallError>,
    pub(super) order: Result<Vec<usize>, ServiceCallError>,
    pub(super) built: RefCell<Vec<String>>,
}

impl Default for StubServices {
    fn default() -> Self {
        Self {
            places: Vec::new(),
            search_failure: None,
            route: Ok(default_route()),
            order: Ok(Vec::new()),
            built: RefCell::new(Vec::new()),
        }
    }
}

impl ServiceBuilder for StubServices {
    fn geocoder(&self, _transport: &HttpServiceConfig) -> Result<Box<dyn Geocoder>, CliError> {
        self.built.borrow_mut().push("geocoder".to_owned());
        let mut geocoder = ScriptedGeocoder::default();
        for (text, results) in &self.places {
            geocoder = geocoder.with_results(text, results.clone());
        }
        if let Some((text, error)) = &self.search_failure {
            geocoder = geocoder.with_error(text, error.clone());
        }
        Ok(Box::new(geocoder))
    }

    fn router(
        &self,
        route_url: &str,
        _transport: &HttpServiceConfig,
    ) -> Result<Box<dyn PathRouter>, CliError> {
        self.built.borrow_mut().push(format!("router {route_url}"));
        Ok(Box::new(match &self.route {
            Ok(route) => StubPathRouter::returning(route.clone()),
            Err(error) => StubPathRouter::failing(error.clone()),
        }))
    }

    fn optimizer(
        &self,
        optimize_url: &str,
        _transport: &HttpServiceConfig,
    ) -> Result<Box<dyn OrderOptimizer>, CliError> {
        self.built.borrow_mut().push(format!("optimizer {optimize_url}"));
        Ok(Box::new(match &self.order {
            Ok(order) => StubOrderOptimizer::returning_order(order.clone()),
            Err(error) => StubOrderOptimizer::failing(error.clone()),
        }))
    }
}
