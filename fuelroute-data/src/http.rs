//! Blocking bridge over the asynchronous `reqwest` client.
//!
//! The capability traits in `fuelroute-core` are synchronous so the core
//! stays embeddable in synchronous contexts. [`BlockingHttp`] owns a
//! current-thread Tokio runtime reused across calls and blocks on it, or on
//! the caller's multi-threaded runtime when one is already running.

use std::fmt;
use std::time::Duration;

use fuelroute_core::ProviderError;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Longest error body echoed back in [`ProviderError::HttpStatus`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors raised while constructing an HTTP-backed provider.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
    /// The configured base URL could not be parsed.
    #[error("invalid base URL {url:?}")]
    BaseUrl {
        /// Base URL as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl HttpResponse {
    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Transport error describing a non-success status.
    pub(crate) fn status_error(&self, url: &Url) -> ProviderError {
        ProviderError::HttpStatus {
            url: url.to_string(),
            status: self.status,
            message: self.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

/// Synchronous GET requests with a shared client and runtime.
pub(crate) struct BlockingHttp {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl fmt::Debug for BlockingHttp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingHttp")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BlockingHttp {
    pub(crate) fn new(user_agent: &str, timeout: Duration) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            timeout,
        })
    }

    /// Issue a GET request and return the status and body.
    ///
    /// Non-success statuses are returned, not raised, so callers can read
    /// service error payloads. Inside a `current_thread` runtime the owned
    /// runtime is used instead, which may block the caller's executor.
    pub(crate) fn get(&self, url: &Url) -> Result<HttpResponse, ProviderError> {
        let future = self.fetch(url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    async fn fetch(&self, url: &Url) -> Result<HttpResponse, ProviderError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_error(&err, url))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_error(&err, url))?;
        Ok(HttpResponse { status, body })
    }

    fn convert_error(&self, error: &reqwest::Error, url: &Url) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return ProviderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        ProviderError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Parse a configured base URL, dropping any trailing slash from its path.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderBuildError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|source| ProviderBuildError::BaseUrl {
        url: base_url.to_owned(),
        source,
    })
}

/// Append path segments to `base`, keeping any path the base already has.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://osrm.test", "http://osrm.test/route/v1")]
    #[case("http://osrm.test/", "http://osrm.test/route/v1")]
    #[case("http://osrm.test/api/", "http://osrm.test/api/route/v1")]
    fn endpoint_keeps_base_path(#[case] base: &str, #[case] expected: &str) {
        let url = parse_base_url(base).expect("valid base");
        assert_eq!(endpoint(&url, &["route", "v1"]).as_str(), expected);
    }

    #[rstest]
    fn rejects_relative_base_url() {
        let err = parse_base_url("not a url").expect_err("relative URL");
        assert!(matches!(err, ProviderBuildError::BaseUrl { .. }));
    }

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(400, false)]
    #[case(503, false)]
    fn classifies_status(#[case] status: u16, #[case] expected: bool) {
        let response = HttpResponse {
            status,
            body: String::new(),
        };
        assert_eq!(response.is_success(), expected);
    }

    #[rstest]
    fn status_error_truncates_body() {
        let response = HttpResponse {
            status: 502,
            body: "x".repeat(1_000),
        };
        let url = Url::parse("http://geocoder.test/search").expect("url");
        let ProviderError::HttpStatus { status, message, .. } = response.status_error(&url) else {
            panic!("expected HttpStatus");
        };
        assert_eq!(status, 502);
        assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
    }
}
