//! Logger installation for the CLI.

use std::io::Write;

use clap::ValueEnum;
use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Verbosity accepted by `--log-level` and the layered configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Disable logging.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    #[value(alias = "warning")]
    Warn,
    /// Informational messages.
    Info,
    /// Debug output, including discarded stale responses.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Map onto the `log` crate filter.
    #[must_use]
    pub const fn to_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

/// Install a stderr logger filtered at `level`.
pub(crate) fn init_logger(level: LogLevel) -> Result<(), CliError> {
    let mut builder = Builder::new();
    builder
        .filter_level(level.to_filter())
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf: &mut Formatter, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                level_tag(record.level()),
                record.target(),
                record.args()
            )
        });
    builder.try_init().map_err(CliError::Logging)
}

const fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
