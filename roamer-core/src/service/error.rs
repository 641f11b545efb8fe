use thiserror::Error;

/// Failures reported by the external geocoding, routing and optimisation
/// services.
///
/// `Network`, `Timeout` and `Http` describe transport failures; `Rejected`
/// and `Parse` describe a service that answered with something unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceCallError {
    /// The service could not be reached.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request did not complete in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The service answered with an application-level error payload.
    #[error("service rejected the request ({code}): {message}")]
    Rejected {
        /// Service status code, such as `InvalidQuery`.
        code: String,
        /// Error message supplied by the service.
        message: String,
    },
    /// The payload could not be decoded or was missing required fields.
    #[error("failed to decode service response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

impl ServiceCallError {
    /// Whether the failure happened before the service produced a payload.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Http { .. }
        )
    }
}
