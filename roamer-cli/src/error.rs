//! Error types emitted by the Roamer CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roamer_core::{PipelineError, ServiceCallError};
use roamer_data::http::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the Roamer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// An option was supplied but holds an unusable value.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },
    /// Installing the logger failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] log::SetLoggerError),
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// A referenced waypoint file does not exist or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Argument that named the path.
        field: &'static str,
        /// Path as supplied.
        path: Utf8PathBuf,
    },
    /// Opening the waypoint file failed.
    #[error("failed to open waypoints at {path:?}: {source}")]
    OpenWaypoints {
        /// Path as supplied.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The waypoint file is not a JSON array of waypoints.
    #[error("failed to parse waypoints JSON at {path:?}: {source}")]
    ParseWaypoints {
        /// Path as supplied.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// A service client could not be constructed.
    #[error("failed to build {service} client: {source}")]
    BuildClient {
        /// Which service the client talks to.
        service: &'static str,
        /// Underlying construction failure.
        #[source]
        source: ClientBuildError,
    },
    /// The geocoder failed to answer the search.
    #[error("search failed: {0}")]
    Search(#[source] ServiceCallError),
    /// `--select` pointed past the end of the result list.
    #[error("no search result at position {position}")]
    NoSuchResult {
        /// Requested position.
        position: usize,
    },
    /// The route pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
