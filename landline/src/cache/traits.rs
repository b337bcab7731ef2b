//! Core traits for the generic cache.
//!
//! The `Cache` trait provides a domain-agnostic key-value interface.
//! Providers implement it; domain clients such as
//! [`FeatureCacheClient`](super::FeatureCacheClient) translate their own
//! types to and from raw bytes on top of it.
//!
//! # Design Principles
//!
//! - **String keys**: human-readable, so entries can be listed and removed
//!   by name from the CLI
//! - **Vec<u8> values**: raw bytes, no serialization opinions imposed
//! - **Dyn-compatible**: uses `Pin<Box<dyn Future>>` for trait object support

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cache directory was written by a newer version.
    #[error("cache schema version {found} is newer than the supported version {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// A schema migration step failed.
    #[error("cache migration failed: {0}")]
    Migration(String),

    /// A stored entry exists but cannot be read back.
    #[error("corrupt cache entry '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// A blocking filesystem task did not complete.
    #[error("cache task failed: {0}")]
    Task(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic cache interface for key-value storage.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
/// Operations are independent: no lock is held between a `get` and a later
/// `set` of the same key.
pub trait Cache: Send + Sync {
    /// Store a value with the given key, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>>;

    /// Delete a value by key, returning whether it existed.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>>;

    /// All stored keys, sorted.
    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>>;

    /// Remove every entry, returning how many were removed.
    fn clear(&self) -> BoxFuture<'_, Result<u64, CacheError>>;

    /// Current size of stored values in bytes.
    fn size_bytes(&self) -> u64;

    /// Current number of entries.
    fn entry_count(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::UnsupportedSchema {
            found: 3,
            supported: 2,
        };
        let message = format!("{}", err);
        assert!(message.contains('3'));
        assert!(message.contains('2'));

        let err = CacheError::Corrupt {
            key: "trails-0".to_string(),
            reason: "truncated".to_string(),
        };
        assert!(format!("{}", err).contains("trails-0"));
    }

    #[test]
    fn test_cache_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cache_err: CacheError = io_err.into();
        assert!(matches!(cache_err, CacheError::Io(_)));
    }
}
