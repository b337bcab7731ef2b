//! Feature collection cache client.
//!
//! Wraps a generic `Cache` with JSON encoding of [`FeatureCollection`]s.
//! A collection is stored under its own `name`, which is always the cache
//! key it was fetched for (`"{service}-{layer_key}"`).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::traits::{Cache, CacheError};
use crate::feature::FeatureCollection;

/// Cache client for decoded feature collections.
#[derive(Clone)]
pub struct FeatureCacheClient {
    cache: Arc<dyn Cache>,
}

impl FeatureCacheClient {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Looks up a collection.
    ///
    /// An entry that no longer parses is logged and reported as a miss, so
    /// the next query refetches and overwrites it.
    pub async fn get(&self, key: &str) -> Result<Option<FeatureCollection>, CacheError> {
        let Some(data) = self.cache.get(key).await? else {
            debug!(key = key, "Feature cache miss");
            return Ok(None);
        };

        match serde_json::from_slice::<FeatureCollection>(&data) {
            Ok(collection) => {
                debug!(key = key, features = collection.len(), "Feature cache hit");
                Ok(Some(collection))
            }
            Err(e) => {
                warn!(key = key, error = %e, "Corrupt feature cache entry, treating as miss");
                Ok(None)
            }
        }
    }

    /// Stores `collection` under its name, replacing any previous entry.
    pub async fn put(&self, collection: &FeatureCollection) -> Result<(), CacheError> {
        let data = serde_json::to_vec(collection)?;
        debug!(
            key = %collection.name,
            features = collection.len(),
            bytes = data.len(),
            "Writing feature cache entry"
        );
        self.cache.set(&collection.name, data).await
    }

    /// Removes an entry, returning whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        self.cache.delete(key).await
    }

    pub async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        self.cache.contains(key).await
    }

    /// Keys of every stored collection, sorted.
    pub async fn list(&self) -> Result<Vec<String>, CacheError> {
        self.cache.keys().await
    }

    /// Removes every entry, returning how many were removed.
    pub async fn clear(&self) -> Result<u64, CacheError> {
        self.cache.clear().await
    }

    /// Total bytes held by the underlying cache.
    pub fn size_bytes(&self) -> u64 {
        self.cache.size_bytes()
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
