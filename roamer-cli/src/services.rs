//! Construction of the external service clients.

use std::time::Duration;

use roamer_core::{Geocoder, OrderOptimizer, PathRouter};
use roamer_data::http::{
    DEFAULT_TIMEOUT_SECS, HttpGeocoder, HttpOrderOptimizer, HttpPathRouter, HttpServiceConfig,
};

use crate::{ARG_TIMEOUT_SECS, CliError};

/// Builds the service clients for one command invocation.
pub(crate) trait ServiceBuilder {
    fn geocoder(&self, transport: &HttpServiceConfig) -> Result<Box<dyn Geocoder>, CliError>;

    fn router(
        &self,
        route_url: &str,
        transport: &HttpServiceConfig,
    ) -> Result<Box<dyn PathRouter>, CliError>;

    fn optimizer(
        &self,
        optimize_url: &str,
        transport: &HttpServiceConfig,
    ) -> Result<Box<dyn OrderOptimizer>, CliError>;
}

/// Builds the `reqwest`-backed clients.
pub(crate) struct HttpServiceBuilder;

impl ServiceBuilder for HttpServiceBuilder {
    fn geocoder(&self, transport: &HttpServiceConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = HttpGeocoder::with_config(transport.clone()).map_err(|source| {
            CliError::BuildClient {
                service: "geocoder",
                source,
            }
        })?;
        Ok(Box::new(geocoder))
    }

    fn router(
        &self,
        route_url: &str,
        transport: &HttpServiceConfig,
    ) -> Result<Box<dyn PathRouter>, CliError> {
        let router = HttpPathRouter::with_config(route_url, transport.clone()).map_err(
            |source| CliError::BuildClient {
                service: "router",
                source,
            },
        )?;
        Ok(Box::new(router))
    }

    fn optimizer(
        &self,
        optimize_url: &str,
        transport: &HttpServiceConfig,
    ) -> Result<Box<dyn OrderOptimizer>, CliError> {
        let optimizer = HttpOrderOptimizer::with_config(optimize_url, transport.clone()).map_err(
            |source| CliError::BuildClient {
                service: "optimizer",
                source,
            },
        )?;
        Ok(Box::new(optimizer))
    }
}

/// Single-threaded runtime driving one command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Resolve the shared transport settings from an optional timeout.
pub(crate) fn transport_config(timeout_secs: Option<u64>) -> Result<HttpServiceConfig, CliError> {
    let secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if secs == 0 {
        return Err(CliError::InvalidArgument {
            field: ARG_TIMEOUT_SECS,
            reason: "must be at least one second",
        });
    }
    Ok(HttpServiceConfig::default().with_timeout(Duration::from_secs(secs)))
}
