//! Optimize command implementation for the Roamer CLI.

use std::io::Write;
use std::rc::Rc;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roamer_core::{OrderOptimizer, PathRouter, RouteOptimizationPipeline, SolverParams, TripState};
use roamer_data::http::HttpServiceConfig;
use serde::{Deserialize, Serialize};

use crate::fs::{load_waypoints, require_existing};
use crate::logging::LogLevel;
use crate::output::{TripOutput, write_json};
use crate::services::{HttpServiceBuilder, ServiceBuilder, runtime, transport_config};
use crate::{
    ARG_OPTIMIZE_URL, ARG_ROUTE_URL, ARG_TIMEOUT_SECS, ARG_WAYPOINTS, CliError, DEFAULT_PROFILE,
    DEFAULT_SOLVER, ENV_OPTIMIZE_OPTIMIZE_URL, ENV_OPTIMIZE_ROUTE_URL, ENV_OPTIMIZE_WAYPOINTS,
};

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON array of waypoints, ask the optimisation service \
                 for a better visiting order, apply it and fetch the path for \
                 the new order. Waypoints without coordinates keep their \
                 slots. The reordered waypoints and the route are printed as \
                 JSON.",
    about = "Reorder a waypoint file and fetch the path for the new order"
)]
#[ortho_config(prefix = "ROAMER")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing an array of waypoints.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) waypoints: Option<Utf8PathBuf>,
    /// Base URL of the path router.
    #[arg(long = ARG_ROUTE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) route_url: Option<String>,
    /// Base URL of the optimisation service.
    #[arg(long = ARG_OPTIMIZE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) optimize_url: Option<String>,
    /// Solver name appended to the optimisation URL (default `tsp`).
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) solver: Option<String>,
    /// Travel profile passed to the solver (default `driving`).
    #[arg(long, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Log verbosity.
    #[arg(long, value_enum, value_name = "level")]
    #[serde(default)]
    pub(crate) log_level: Option<LogLevel>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptimizeConfig {
    pub(crate) waypoints: Utf8PathBuf,
    pub(crate) route_url: String,
    pub(crate) optimize_url: String,
    pub(crate) params: SolverParams,
    pub(crate) transport: HttpServiceConfig,
    pub(crate) log_level: LogLevel,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.waypoints, ARG_WAYPOINTS)
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let waypoints = args.waypoints.ok_or(CliError::MissingArgument {
            field: ARG_WAYPOINTS,
            env: ENV_OPTIMIZE_WAYPOINTS,
        })?;
        let route_url = args.route_url.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_URL,
            env: ENV_OPTIMIZE_ROUTE_URL,
        })?;
        let optimize_url = args.optimize_url.ok_or(CliError::MissingArgument {
            field: ARG_OPTIMIZE_URL,
            env: ENV_OPTIMIZE_OPTIMIZE_URL,
        })?;
        let params = SolverParams::new(
            args.solver.unwrap_or_else(|| DEFAULT_SOLVER.to_owned()),
            args.profile.unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
        );
        Ok(Self {
            waypoints,
            route_url,
            optimize_url,
            params,
            transport: transport_config(args.timeout_secs)?,
            log_level: args.log_level.unwrap_or_default(),
        })
    }
}

pub(super) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    crate::logging::init_logger(config.log_level)?;
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(&config, &HttpServiceBuilder, &mut stdout)
}

pub(super) fn run_optimize_with(
    config: &OptimizeConfig,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    config.validate_sources()?;
    let trip = Rc::new(TripState::with_waypoints(load_waypoints(&config.waypoints)?));
    let router = builder.router(&config.route_url, &config.transport)?;
    let optimizer = builder.optimizer(&config.optimize_url, &config.transport)?;
    let output =
        runtime()?.block_on(execute_optimize(&*router, &*optimizer, trip, &config.params))?;
    write_json(writer, &output)
}

async fn execute_optimize(
    router: &dyn PathRouter,
    optimizer: &dyn OrderOptimizer,
    trip: Rc<TripState>,
    params: &SolverParams,
) -> Result<TripOutput, CliError> {
    let pipeline = RouteOptimizationPipeline::new(router, optimizer, trip, ());
    let optimized = pipeline.optimize(params).await?;
    Ok(TripOutput::from(optimized))
}
