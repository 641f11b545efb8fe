//! Command-line interface for the Roamer trip planner.
//!
//! Three subcommands drive the core components against the HTTP services:
//! `search` geocodes a text, `route` fetches the path through a waypoint
//! file and `optimize` reorders a waypoint file before fetching its path.
//! Options layer defaults, configuration files, `ROAMER_*` environment
//! variables and CLI flags through `ortho_config`.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod logging;
mod optimize;
mod output;
mod route;
mod search;
mod services;

pub use error::CliError;
pub use logging::LogLevel;

use optimize::{OptimizeArgs, run_optimize};
use route::{RouteArgs, run_route};
use search::{SearchArgs, run_search};

const ARG_SEARCH_TEXT: &str = "text";
const ARG_ACCESS_TOKEN: &str = "access-token";
const ARG_WAYPOINTS: &str = "waypoints";
const ARG_ROUTE_URL: &str = "route-url";
const ARG_OPTIMIZE_URL: &str = "optimize-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_SEARCH_TEXT: &str = "ROAMER_CMDS_SEARCH_TEXT";
const ENV_ACCESS_TOKEN: &str = "ROAMER_CMDS_SEARCH_ACCESS_TOKEN";
const ENV_ROUTE_WAYPOINTS: &str = "ROAMER_CMDS_ROUTE_WAYPOINTS";
const ENV_ROUTE_ROUTE_URL: &str = "ROAMER_CMDS_ROUTE_ROUTE_URL";
const ENV_OPTIMIZE_WAYPOINTS: &str = "ROAMER_CMDS_OPTIMIZE_WAYPOINTS";
const ENV_OPTIMIZE_ROUTE_URL: &str = "ROAMER_CMDS_OPTIMIZE_ROUTE_URL";
const ENV_OPTIMIZE_OPTIMIZE_URL: &str = "ROAMER_CMDS_OPTIMIZE_OPTIMIZE_URL";
const DEFAULT_SOLVER: &str = "tsp";
const DEFAULT_PROFILE: &str = "driving";

/// Run the Roamer CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, a
/// waypoint file cannot be read, a service call fails or output cannot be
/// written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Search(args) => run_search(args),
        Command::Route(args) => run_route(args),
        Command::Optimize(args) => run_optimize(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roamer",
    about = "Search places, fetch routes and optimise trips from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode a search text.
    Search(SearchArgs),
    /// Fetch the path through a waypoint file.
    Route(RouteArgs),
    /// Reorder a waypoint file and fetch the path for the new order.
    Optimize(OptimizeArgs),
}

#[cfg(test)]
mod tests;
