//! Mapbox-compatible geocoding client.

use async_trait::async_trait;
use reqwest::Client;
use roamer_core::{Geocoder, SearchQuery, SearchResult, ServiceCallError};
use url::Url;

use super::config::{ClientBuildError, HttpServiceConfig};
use super::transport::get_json;
use super::wire::GeocodeResponse;

/// Geocoder issuing `GET {endpoint}/geocoding/v5/{source}/{text}.json`.
///
/// Endpoint, source, token and proximity travel with each
/// [`SearchQuery`], so one client serves any configuration.
///
/// # Example
///
/// ```no_run
/// use roamer_core::{Geocoder, SearchOptions};
/// use roamer_data::http::HttpGeocoder;
///
/// # async fn lookup() -> Result<(), Box<dyn std::error::Error>> {
/// let geocoder = HttpGeocoder::new()?;
/// let query = SearchOptions::new("pk.token").query("Lyon");
/// let results = geocoder.search(&query).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: Client,
    config: HttpServiceConfig,
}

impl HttpGeocoder {
    /// Create a geocoder with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpServiceConfig::default())
    }

    /// Create a geocoder with explicit transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpServiceConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            client: config.build_client()?,
            config,
        })
    }

    /// Build the request URL for `query`.
    ///
    /// The search text is percent-encoded as a single path segment.
    fn build_search_url(query: &SearchQuery) -> Result<Url, ServiceCallError> {
        let mut url = Url::parse(&query.endpoint).map_err(|err| ServiceCallError::Network {
            url: query.endpoint.clone(),
            message: format!("invalid endpoint: {err}"),
        })?;
        url.path_segments_mut()
            .map_err(|()| ServiceCallError::Network {
                url: query.endpoint.clone(),
                message: "endpoint cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(["geocoding", "v5", query.source.as_str()])
            .push(&format!("{}.json", query.text));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &query.access_token);
            if !query.proximity.is_empty() {
                pairs.append_pair("proximity", &query.proximity);
            }
        }
        Ok(url)
    }
}

#[async_trait(?Send)]
impl Geocoder for HttpGeocoder {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ServiceCallError> {
        let url = Self::build_search_url(query)?;
        let response: GeocodeResponse = get_json(&self.client, &url, self.config.timeout).await?;
        response.into_results()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamer_core::SearchOptions;
    use rstest::rstest;

    #[rstest]
    fn search_url_encodes_text_and_token() {
        let query = SearchOptions::new("pk.abc")
            .with_endpoint("https://geo.example.com/")
            .query("Saint Étienne");

        let url = HttpGeocoder::build_search_url(&query).expect("valid endpoint");

        assert_eq!(
            url.as_str(),
            "https://geo.example.com/geocoding/v5/mapbox.places/Saint%20%C3%89tienne.json?access_token=pk.abc"
        );
    }

    #[rstest]
    fn proximity_is_only_sent_when_set() {
        let query = SearchOptions::new("t")
            .with_source("mapbox.places-permanent")
            .with_proximity("2.35,48.85")
            .query("gare");

        let url = HttpGeocoder::build_search_url(&query).expect("valid endpoint");

        assert!(url.path().ends_with("/mapbox.places-permanent/gare.json"));
        assert_eq!(url.query(), Some("access_token=t&proximity=2.35%2C48.85"));
    }

    #[rstest]
    fn slashes_in_text_stay_inside_one_segment() {
        let query = SearchOptions::new("t").query("a/b");

        let url = HttpGeocoder::build_search_url(&query).expect("valid endpoint");

        assert!(url.path().ends_with("/a%2Fb.json"));
    }

    #[rstest]
    fn invalid_endpoint_is_reported() {
        let query = SearchOptions::new("t").with_endpoint("not a url").query("x");

        let err = HttpGeocoder::build_search_url(&query).expect_err("invalid endpoint");

        assert!(err.is_transport());
    }
}
