//! Local persistent cache for fetched feature collections.
//!
//! # Architecture
//!
//! - [`Cache`]: generic async key-value trait (string keys, byte values)
//! - [`providers`]: memory (moka) and disk implementations
//! - [`FeatureCacheClient`]: stores [`FeatureCollection`]s as JSON
//! - [`schema`]: versioned on-disk layout with ordered migrations
//!
//! Keys are `"{service}-{layer_key}"`, see [`cache_key`].
//!
//! [`FeatureCollection`]: crate::feature::FeatureCollection

mod clients;
pub mod providers;
pub mod schema;
mod traits;

use std::path::PathBuf;

pub use clients::FeatureCacheClient;
pub use providers::{DiskCacheProvider, MemoryCacheProvider};
pub use schema::CURRENT_SCHEMA_VERSION;
pub use traits::{BoxFuture, Cache, CacheError};

/// Builds the key a feature collection is cached under.
///
/// ```
/// assert_eq!(landline::cache::cache_key("trails", "0"), "trails-0");
/// ```
pub fn cache_key(service_name: &str, layer_key: &str) -> String {
    format!("{}-{}", service_name, layer_key)
}

/// Default cache location: the platform cache directory, falling back to
/// the working directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("landline")
}
