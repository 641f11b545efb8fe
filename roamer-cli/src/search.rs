//! Search command implementation for the Roamer CLI.

use std::cell::RefCell;
use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roamer_core::{
    DEFAULT_ENDPOINT, DEFAULT_SOURCE, Geocoder, ResponseOutcome, SearchCoordinator, SearchEvents,
    SearchOptions, SearchResult, ServiceCallError,
};
use roamer_data::http::HttpServiceConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::output::write_json;
use crate::services::{HttpServiceBuilder, ServiceBuilder, runtime, transport_config};
use crate::{
    ARG_ACCESS_TOKEN, ARG_SEARCH_TEXT, ARG_TIMEOUT_SECS, CliError, ENV_ACCESS_TOKEN,
    ENV_SEARCH_TEXT,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Send the text to a Mapbox-compatible geocoder and print the \
                 matching places as JSON. Endpoint, source and token can come \
                 from CLI flags, configuration files, or environment variables.",
    about = "Look up places matching a search text"
)]
#[ortho_config(prefix = "ROAMER")]
pub(crate) struct SearchArgs {
    /// Text to geocode.
    #[arg(value_name = "text")]
    #[serde(default)]
    pub(crate) text: Option<String>,
    /// Geocoding service base URL.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// Geocoding data source, such as `mapbox.places`.
    #[arg(long, value_name = "source")]
    #[serde(default)]
    pub(crate) source: Option<String>,
    /// Access token forwarded to the geocoder.
    #[arg(long = ARG_ACCESS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    /// Bias results towards a `lon,lat` position.
    #[arg(long, value_name = "lon,lat")]
    #[serde(default)]
    pub(crate) proximity: Option<String>,
    /// Print only the result at this position, as if it had been clicked.
    #[arg(long, value_name = "position")]
    #[serde(default)]
    pub(crate) select: Option<usize>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Log verbosity.
    #[arg(long, value_enum, value_name = "level")]
    #[serde(default)]
    pub(crate) log_level: Option<LogLevel>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) text: String,
    pub(crate) options: SearchOptions,
    pub(crate) select: Option<usize>,
    pub(crate) transport: HttpServiceConfig,
    pub(crate) log_level: LogLevel,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let text = args.text.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_TEXT,
            env: ENV_SEARCH_TEXT,
        })?;
        if text.trim().is_empty() {
            return Err(CliError::InvalidArgument {
                field: ARG_SEARCH_TEXT,
                reason: "must not be blank",
            });
        }
        let access_token = args.access_token.ok_or(CliError::MissingArgument {
            field: ARG_ACCESS_TOKEN,
            env: ENV_ACCESS_TOKEN,
        })?;

        let options = SearchOptions::new(access_token)
            .with_endpoint(args.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()))
            .with_source(args.source.unwrap_or_else(|| DEFAULT_SOURCE.to_owned()))
            .with_proximity(args.proximity.unwrap_or_default());

        Ok(Self {
            text,
            options,
            select: args.select,
            transport: transport_config(args.timeout_secs)?,
            log_level: args.log_level.unwrap_or_default(),
        })
    }
}

/// Keeps the error reported for the authoritative request.
#[derive(Debug, Default)]
struct FailureSlot(RefCell<Option<ServiceCallError>>);

impl SearchEvents for FailureSlot {
    fn on_search_error(&self, error: &ServiceCallError) {
        self.0.replace(Some(error.clone()));
    }
}

pub(super) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    crate::logging::init_logger(config.log_level)?;
    let mut stdout = std::io::stdout().lock();
    run_search_with(&config, &HttpServiceBuilder, &mut stdout)
}

pub(super) fn run_search_with(
    config: &SearchConfig,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let geocoder = builder.geocoder(&config.transport)?;
    let results = runtime()?.block_on(execute_search(&*geocoder, config))?;
    match config.select {
        Some(position) => {
            let selected = results
                .into_iter()
                .next()
                .ok_or(CliError::NoSuchResult { position })?;
            write_json(writer, &selected)
        }
        None => write_json(writer, &results),
    }
}

/// Run one search through the coordinator.
///
/// With `select` set, the returned list holds only the clicked result.
async fn execute_search(
    geocoder: &dyn Geocoder,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, CliError> {
    let failure = FailureSlot::default();
    let coordinator = SearchCoordinator::new(geocoder, &failure, config.options.clone());
    let outcome = coordinator.handle_input(&config.text).await;
    if outcome == Some(ResponseOutcome::Failed)
        && let Some(error) = failure.0.take()
    {
        return Err(CliError::Search(error));
    }
    Ok(match config.select {
        Some(position) => coordinator.click(position).into_iter().collect(),
        None => coordinator.results(),
    })
}
