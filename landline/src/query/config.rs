//! Orchestrator configuration

use std::time::Duration;

use super::chunk::ChunkConfig;
use crate::arcgis::{ServiceEndpoint, DEFAULT_OUT_SR};

/// Default bound on the remote phase of a query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for [`FeatureServiceClient`](super::FeatureServiceClient).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub endpoint: ServiceEndpoint,
    pub chunks: ChunkConfig,
    /// Attribute fields requested per feature; empty means all (`*`).
    pub out_fields: Vec<String>,
    /// Output spatial reference WKID.
    pub out_sr: u32,
    /// Deadline for authentication, discovery and chunk fetches together.
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            endpoint: ServiceEndpoint::default(),
            chunks: ChunkConfig::default(),
            out_fields: vec!["*".to_string()],
            out_sr: DEFAULT_OUT_SR,
            timeout: Some(DEFAULT_QUERY_TIMEOUT),
        }
    }
}

impl QueryConfig {
    pub fn with_endpoint(mut self, endpoint: ServiceEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_chunks(mut self, chunks: ChunkConfig) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn with_out_fields(mut self, out_fields: Vec<String>) -> Self {
        self.out_fields = out_fields;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.out_fields, vec!["*".to_string()]);
        assert_eq!(config.out_sr, 4326);
        assert_eq!(config.timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.chunks.divisor, 3);
        assert_eq!(config.chunks.max_chunk_size, 10_000);
    }
}
