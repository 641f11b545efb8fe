//! Request execution and error mapping shared by the adapters.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use roamer_core::ServiceCallError;
use serde::de::DeserializeOwned;
use url::Url;

/// Issue a GET request and decode the JSON body.
///
/// HTTP error statuses are reported before the body is read.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<T, ServiceCallError> {
    debug!("GET {url}");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| convert_reqwest_error(&err, url, timeout))?
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err, url, timeout))?;

    response
        .json()
        .await
        .map_err(|err| ServiceCallError::Parse {
            message: err.to_string(),
        })
}

/// Convert a reqwest error to a [`ServiceCallError`].
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &Url,
    timeout: Duration,
) -> ServiceCallError {
    if error.is_timeout() {
        return ServiceCallError::Timeout {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return ServiceCallError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    ServiceCallError::Network {
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// Convert seconds reported by a service into a [`Duration`].
pub(crate) fn seconds(value: f64, field: &str) -> Result<Duration, ServiceCallError> {
    Duration::try_from_secs_f64(value).map_err(|err| ServiceCallError::Parse {
        message: format!("invalid {field} {value}: {err}"),
    })
}
