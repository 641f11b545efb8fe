//! Order-optimisation client.

use async_trait::async_trait;
use reqwest::Client;
use roamer_core::{
    CoordinateQuery, OptimizerResponse, OrderOptimizer, ServiceCallError, SolverParams,
};
use url::Url;

use super::config::{ClientBuildError, HttpServiceConfig, parse_base_url};
use super::transport::get_json;
use super::wire::OptimizeResponse;

/// Optimiser issuing
/// `GET {optimize_url}/{solver}?coordinates=...&profile=...`.
#[derive(Debug, Clone)]
pub struct HttpOrderOptimizer {
    client: Client,
    base_url: Url,
    config: HttpServiceConfig,
}

impl HttpOrderOptimizer {
    /// Create an optimiser for `optimize_url` with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client fails to build.
    pub fn new(optimize_url: &str) -> Result<Self, ClientBuildError> {
        Self::with_config(optimize_url, HttpServiceConfig::default())
    }

    /// Create an optimiser with explicit transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client fails to build.
    pub fn with_config(
        optimize_url: &str,
        config: HttpServiceConfig,
    ) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: config.build_client()?,
            base_url: parse_base_url(optimize_url)?,
            config,
        })
    }

    fn build_optimize_url(
        &self,
        coordinates: &CoordinateQuery,
        params: &SolverParams,
    ) -> Result<Url, ServiceCallError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceCallError::Network {
                url: self.base_url.to_string(),
                message: "optimiser URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .push(&params.solver);
        url.set_query(Some(&format!("coordinates={coordinates}")));
        url.query_pairs_mut().append_pair("profile", &params.profile);
        Ok(url)
    }
}

#[async_trait(?Send)]
impl OrderOptimizer for HttpOrderOptimizer {
    async fn optimize(
        &self,
        coordinates: &CoordinateQuery,
        params: &SolverParams,
    ) -> Result<OptimizerResponse, ServiceCallError> {
        let url = self.build_optimize_url(coordinates, params)?;
        let response: OptimizeResponse = get_json(&self.client, &url, self.config.timeout).await?;
        response.into_response()
    }
}
