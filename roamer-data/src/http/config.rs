//! Client configuration shared by the HTTP service adapters.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Default user agent for service requests.
pub const DEFAULT_USER_AGENT: &str = "roamer/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    HttpClient {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The configured service URL is not a valid absolute URL.
    #[error("invalid service URL {url}: {source}")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Transport settings for the service adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServiceConfig {
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpServiceConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn build_client(&self) -> Result<Client, ClientBuildError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(|source| ClientBuildError::HttpClient { source })
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ClientBuildError> {
    Url::parse(raw).map_err(|source| ClientBuildError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}
