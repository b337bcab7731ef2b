//! Query error taxonomy

use std::time::Duration;

use thiserror::Error;

use crate::arcgis::{LayerResolutionError, ResponseError};
use crate::auth::AuthError;
use crate::cache::CacheError;
use crate::http::HttpError;
use crate::pbf::DecodeError;

/// Errors returned by a feature service query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No usable token could be obtained.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// No layer id could be chosen.
    #[error(transparent)]
    LayerResolution(#[from] LayerResolutionError),

    /// A chunk response could not be decoded.
    #[error("failed to decode chunk at offset {offset}: {source}")]
    Decode {
        offset: u64,
        #[source]
        source: DecodeError,
    },

    /// A request failed at the transport level.
    #[error("network error: {0}")]
    Network(#[from] HttpError),

    /// The service answered with an error body.
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    /// A response could not be interpreted, or a request URL not built.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The cache could not be opened.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// The remote phase exceeded the configured deadline.
    #[error("query '{cache_key}' timed out after {elapsed:?}")]
    Timeout { cache_key: String, elapsed: Duration },

    /// The caller cancelled the query.
    #[error("query '{0}' was cancelled")]
    Cancelled(String),
}

impl From<ResponseError> for QueryError {
    fn from(error: ResponseError) -> Self {
        match error {
            ResponseError::Service { code, message } => QueryError::Service { code, message },
            ResponseError::Malformed(reason) | ResponseError::InvalidUrl(reason) => {
                QueryError::InvalidResponse(reason)
            }
        }
    }
}

impl QueryError {
    /// Whether retrying the same query later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Network(HttpError::Status { status, .. }) => *status >= 500,
            QueryError::Network(_) | QueryError::Timeout { .. } => true,
            QueryError::Auth(AuthError::Http(_)) => true,
            _ => false,
        }
    }
}
