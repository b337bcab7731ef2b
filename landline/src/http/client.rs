//! Async HTTP client trait and the reqwest implementation

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::HttpError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    /// Performs an async HTTP POST request without a body.
    ///
    /// ArcGIS OAuth endpoints take every parameter in the query string, so
    /// no body is needed.
    fn post(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    /// Performs a GET whose response may be served from a response cache.
    ///
    /// Clients without a response cache fall back to [`AsyncHttpClient::get`].
    fn get_cacheable(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send {
        self.get(url)
    }
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("landline/", env!("CARGO_PKG_VERSION"));

/// Async HTTP client implementation using reqwest.
///
/// Connection pooling keeps the parallel chunk queries of a single
/// feature-service query on warm connections.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<Vec<u8>, HttpError> {
        let status = response.status();
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(HttpError::BodyRead(e.to_string()))
            }
        }
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::RequestFailed(e.to_string()));
            }
        };

        Self::read_body(url, response).await
    }

    async fn post(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.client.post(url).send().await.map_err(|e| {
            warn!(error = %e, "HTTP POST request failed");
            HttpError::RequestFailed(e.to_string())
        })?;

        Self::read_body(url, response).await
    }
}
