//! Route command implementation for the Roamer CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roamer_core::{PathRouter, PipelineError, TripState, coordinate_query};
use roamer_data::http::HttpServiceConfig;
use serde::{Deserialize, Serialize};

use crate::fs::{load_waypoints, require_existing};
use crate::logging::LogLevel;
use crate::output::{TripOutput, write_json};
use crate::services::{HttpServiceBuilder, ServiceBuilder, runtime, transport_config};
use crate::{
    ARG_ROUTE_URL, ARG_TIMEOUT_SECS, ARG_WAYPOINTS, CliError, ENV_ROUTE_ROUTE_URL,
    ENV_ROUTE_WAYPOINTS,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON array of waypoints, order them by index and ask \
                 the path router for the route through every waypoint that \
                 has coordinates. Waypoints without coordinates are kept in \
                 the output but skipped in the request.",
    about = "Fetch the path through a waypoint file in its current order"
)]
#[ortho_config(prefix = "ROAMER")]
pub(crate) struct RouteArgs {
    /// Path to a JSON file containing an array of waypoints.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) waypoints: Option<Utf8PathBuf>,
    /// Base URL of the path router.
    #[arg(long = ARG_ROUTE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) route_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Log verbosity.
    #[arg(long, value_enum, value_name = "level")]
    #[serde(default)]
    pub(crate) log_level: Option<LogLevel>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteConfig {
    pub(crate) waypoints: Utf8PathBuf,
    pub(crate) route_url: String,
    pub(crate) transport: HttpServiceConfig,
    pub(crate) log_level: LogLevel,
}

impl RouteConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.waypoints, ARG_WAYPOINTS)
    }
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let waypoints = args.waypoints.ok_or(CliError::MissingArgument {
            field: ARG_WAYPOINTS,
            env: ENV_ROUTE_WAYPOINTS,
        })?;
        let route_url = args.route_url.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_URL,
            env: ENV_ROUTE_ROUTE_URL,
        })?;
        Ok(Self {
            waypoints,
            route_url,
            transport: transport_config(args.timeout_secs)?,
            log_level: args.log_level.unwrap_or_default(),
        })
    }
}

pub(super) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    crate::logging::init_logger(config.log_level)?;
    let mut stdout = std::io::stdout().lock();
    run_route_with(&config, &HttpServiceBuilder, &mut stdout)
}

pub(super) fn run_route_with(
    config: &RouteConfig,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    config.validate_sources()?;
    let trip = TripState::with_waypoints(load_waypoints(&config.waypoints)?);
    let router = builder.router(&config.route_url, &config.transport)?;
    let output = runtime()?.block_on(fetch_path(&*router, &trip))?;
    write_json(writer, &output)
}

async fn fetch_path(router: &dyn PathRouter, trip: &TripState) -> Result<TripOutput, CliError> {
    let snapshot = trip.snapshot();
    let query = coordinate_query(&snapshot.waypoints);
    debug!("fetching path for {} waypoints", snapshot.len());
    let route = router
        .fetch_route(&query)
        .await
        .map_err(|source| PipelineError::PathFetch { source })?;
    Ok(TripOutput {
        waypoints: snapshot.waypoints.to_vec(),
        route,
    })
}
