//! Domain-specific cache clients.
//!
//! ```text
//! ┌──────────────────────────┐
//! │   FeatureCacheClient     │
//! │                          │
//! │ FeatureCollection ⇄ JSON │
//! └────────────┬─────────────┘
//!              │
//!              ▼
//! ┌──────────────────────────┐
//! │      Arc<dyn Cache>      │
//! │ string key → Vec<u8>     │
//! └──────────────────────────┘
//! ```

mod features;

pub use features::FeatureCacheClient;
