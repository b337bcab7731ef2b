//! HTTP transport abstraction for testability.
//!
//! Every component that talks to ArcGIS Online goes through
//! [`AsyncHttpClient`], so tests can substitute a scripted client and the
//! production build uses [`AsyncReqwestClient`].
//!
//! Chunk queries are issued through [`AsyncHttpClient::get_cacheable`].
//! Wrapping a client in [`CachingHttpClient`] memoizes those responses in
//! memory, which is the transport-level response cache the query layer asks
//! for. Plain `get` and `post` calls are never cached.

mod caching;
mod client;
mod types;

pub use caching::{CachingHttpClient, DEFAULT_RESPONSE_CACHE_BYTES};
pub use client::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::HttpError;

#[cfg(test)]
pub use client::tests::MockAsyncHttpClient;
