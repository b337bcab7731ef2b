//! Settings structs, one per `[section]` of the config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::arcgis::{
    ServiceEndpoint, DEFAULT_ORG_ID, DEFAULT_OUT_SR, DEFAULT_SERVICES_HOST, DEFAULT_TOKEN_URL,
};
use crate::auth::DEFAULT_TOKEN_EXPIRATION;
use crate::cache::default_cache_dir;
use crate::http::DEFAULT_RESPONSE_CACHE_BYTES;
use crate::logging::DEFAULT_LOG_FILE;
use crate::query::{
    ChunkConfig, QueryConfig, DEFAULT_CHUNK_DIVISOR, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_QUERY_TIMEOUT,
};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub arcgis: ArcgisSettings,
    pub query: QuerySettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

/// ArcGIS Online organization and token endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcgisSettings {
    pub services_host: String,
    pub org_id: String,
    pub token_url: String,
    /// Requested token lifetime in minutes.
    pub token_expiration: u32,
}

impl Default for ArcgisSettings {
    fn default() -> Self {
        Self {
            services_host: DEFAULT_SERVICES_HOST.to_string(),
            org_id: DEFAULT_ORG_ID.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_expiration: DEFAULT_TOKEN_EXPIRATION,
        }
    }
}

/// Chunking and request shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub chunk_divisor: u64,
    pub max_chunk_size: u64,
    /// Seconds; `0` disables the deadline.
    pub timeout_secs: u64,
    pub out_fields: Vec<String>,
    pub out_sr: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            chunk_divisor: DEFAULT_CHUNK_DIVISOR,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            timeout_secs: DEFAULT_QUERY_TIMEOUT.as_secs(),
            out_fields: vec!["*".to_string()],
            out_sr: DEFAULT_OUT_SR,
        }
    }
}

/// Geometry cache location and HTTP response cache size.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub response_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: default_cache_dir(),
            response_cache_size: DEFAULT_RESPONSE_CACHE_BYTES,
        }
    }
}

/// Log file location.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: super::file::config_directory().join(DEFAULT_LOG_FILE),
        }
    }
}

impl ConfigFile {
    /// Where the configured organization's services live.
    pub fn endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint::new(&self.arcgis.services_host, &self.arcgis.org_id)
    }

    /// Orchestrator settings derived from `[arcgis]` and `[query]`.
    pub fn query_config(&self) -> QueryConfig {
        let timeout = match self.query.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        QueryConfig {
            endpoint: self.endpoint(),
            chunks: ChunkConfig {
                divisor: self.query.chunk_divisor,
                max_chunk_size: self.query.max_chunk_size,
            },
            out_fields: self.query.out_fields.clone(),
            out_sr: self.query.out_sr,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_config_matches_library_defaults() {
        assert_eq!(ConfigFile::default().query_config(), QueryConfig::default());
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let mut config = ConfigFile::default();
        config.query.timeout_secs = 0;
        assert_eq!(config.query_config().timeout, None);
    }

    #[test]
    fn test_endpoint_uses_configured_org() {
        let mut config = ConfigFile::default();
        config.arcgis.org_id = "abc123".to_string();
        assert_eq!(
            config.endpoint().service_url("Trails"),
            "https://services.arcgis.com/abc123/arcgis/rest/services/Trails/FeatureServer"
        );
    }
}
