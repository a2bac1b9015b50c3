//! [`Geocoder`] implementation backed by Nominatim's search API.

use std::time::Duration;

use fuelroute_core::{GeocodeCandidate, Geocoder, ProviderError};
use log::debug;
use url::Url;

use super::nominatim::Place;
use crate::http::{BlockingHttp, ProviderBuildError, endpoint, parse_base_url};

/// Public Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests.
pub const DEFAULT_USER_AGENT: &str = "fuelroute-geocoding/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of candidates requested per search.
const DEFAULT_RESULT_LIMIT: u32 = 10;

/// Default country restriction.
const DEFAULT_COUNTRY_CODE: &str = "us";

/// Configuration for [`HttpGeocoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests. Nominatim rejects anonymous clients.
    pub user_agent: String,
    /// Maximum number of candidates requested.
    pub result_limit: u32,
    /// ISO 3166-1 alpha-2 country restriction.
    pub country_code: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            result_limit: DEFAULT_RESULT_LIMIT,
            country_code: DEFAULT_COUNTRY_CODE.to_owned(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

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

    /// Set the number of candidates requested.
    #[must_use]
    pub fn with_result_limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit;
        self
    }

    /// Set the country restriction.
    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }
}

/// Geocoder issuing one Nominatim search per call.
///
/// A non-success status is a transport failure; an empty result list is
/// `Ok(vec![])`.
#[derive(Debug)]
pub struct HttpGeocoder {
    http: BlockingHttp,
    search_url: Url,
    config: NominatimConfig,
}

impl HttpGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ProviderBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let http = BlockingHttp::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            search_url: endpoint(&base, &["search"]),
            config,
        })
    }

    /// Borrow the configuration.
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Build the search URL for `query`.
    fn build_search_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", &self.config.result_limit.to_string())
            .append_pair("countrycodes", &self.config.country_code);
        url
    }

    fn parse_places(url: &Url, body: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        let places: Vec<Place> =
            serde_json::from_str(body).map_err(|err| ProviderError::Parse {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        Ok(places.into_iter().map(GeocodeCandidate::from).collect())
    }
}

impl Geocoder for HttpGeocoder {
    fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        let url = self.build_search_url(query);
        let response = self.http.get(&url)?;
        if !response.is_success() {
            return Err(response.status_error(&url));
        }
        let candidates = Self::parse_places(&url, &response.body)?;
        debug!("nominatim returned {} candidates for {query:?}", candidates.len());
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn geocoder() -> HttpGeocoder {
        HttpGeocoder::new("http://nominatim.test/").expect("geocoder should build")
    }

    #[rstest]
    fn search_url_carries_country_and_limit(geocoder: HttpGeocoder) {
        let url = geocoder.build_search_url("123 Main St 5 and Route 9, Springfield, OH, USA");
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "q".to_owned(),
                    "123 Main St 5 and Route 9, Springfield, OH, USA".to_owned()
                ),
                ("format".to_owned(), "json".to_owned()),
                ("limit".to_owned(), "10".to_owned()),
                ("countrycodes".to_owned(), "us".to_owned()),
            ]
        );
    }

    #[rstest]
    fn empty_result_is_not_an_error() {
        let url = Url::parse("http://nominatim.test/search").expect("url");
        let candidates = HttpGeocoder::parse_places(&url, "[]").expect("empty list");
        assert!(candidates.is_empty());
    }

    #[rstest]
    fn malformed_body_is_a_parse_error() {
        let url = Url::parse("http://nominatim.test/search").expect("url");
        let err = HttpGeocoder::parse_places(&url, "<html>").expect_err("not JSON");
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = NominatimConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_result_limit(3)
            .with_country_code("ca");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.result_limit, 3);
        assert_eq!(config.country_code, "ca");
    }
}
