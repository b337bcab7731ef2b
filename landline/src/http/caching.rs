//! Response-caching decorator for any [`AsyncHttpClient`].

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::trace;

use super::client::AsyncHttpClient;
use super::types::HttpError;

/// Default response cache budget (256 MB).
pub const DEFAULT_RESPONSE_CACHE_BYTES: u64 = 256 * 1024 * 1024;

/// HTTP client decorator that memoizes cacheable GET responses.
///
/// Only successful responses fetched through
/// [`AsyncHttpClient::get_cacheable`] are stored, keyed by the full URL.
/// Entries are weighted by body size and evicted LRU once the budget is
/// exceeded. Clones share the cache.
#[derive(Clone)]
pub struct CachingHttpClient<C: AsyncHttpClient> {
    inner: C,
    responses: MokaCache<String, Arc<Vec<u8>>>,
}

impl<C: AsyncHttpClient> CachingHttpClient<C> {
    /// Wraps `inner` with a response cache of at most `max_size_bytes`.
    pub fn new(inner: C, max_size_bytes: u64) -> Self {
        let responses = MokaCache::builder()
            .weigher(|_url: &String, body: &Arc<Vec<u8>>| -> u32 {
                body.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self { inner, responses }
    }
}

impl<C: AsyncHttpClient> AsyncHttpClient for CachingHttpClient<C> {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.inner.get(url).await
    }

    async fn post(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.inner.post(url).await
    }

    async fn get_cacheable(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        if let Some(body) = self.responses.get(url).await {
            trace!(url = url, bytes = body.len(), "response cache hit");
            return Ok(body.as_ref().clone());
        }

        let body = self.inner.get(url).await?;
        self.responses
            .insert(url.to_string(), Arc::new(body.clone()))
            .await;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockAsyncHttpClient;

    #[tokio::test]
    async fn test_cacheable_get_hits_network_once() {
        let mock = MockAsyncHttpClient::new().route("f=pbf", Ok(vec![9, 9, 9]));
        let client = CachingHttpClient::new(mock.clone(), 1_000_000);

        let first = client.get_cacheable("http://x/query?f=pbf").await.unwrap();
        let second = client.get_cacheable("http://x/query?f=pbf").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_plain_get_bypasses_cache() {
        let mock = MockAsyncHttpClient::new().route("layers", Ok(b"{}".to_vec()));
        let client = CachingHttpClient::new(mock.clone(), 1_000_000);

        client.get("http://x/layers").await.unwrap();
        client.get("http://x/layers").await.unwrap();

        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mock = MockAsyncHttpClient::new();
        let client = CachingHttpClient::new(mock.clone(), 1_000_000);

        assert!(client.get_cacheable("http://x/missing").await.is_err());
        assert!(client.get_cacheable("http://x/missing").await.is_err());

        assert_eq!(mock.request_count(), 2);
    }
}
