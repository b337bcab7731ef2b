//! Cache provider implementations.
//!
//! # Available Providers
//!
//! - [`MemoryCacheProvider`]: in-memory LRU cache using moka
//! - [`DiskCacheProvider`]: durable, versioned on-disk cache

mod disk;
mod memory;

pub use disk::DiskCacheProvider;
pub use memory::MemoryCacheProvider;
