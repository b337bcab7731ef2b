//! Landline - greenway geometry from ArcGIS Online feature services
//!
//! This library fetches trail, greenway and boundary layers from ArcGIS
//! Online, decodes the PBF geometry responses into GeoJSON-shaped feature
//! collections, and keeps them in a local durable cache.
//!
//! # Pipeline
//!
//! ```text
//! caller ─► FeatureServiceClient ─► FeatureCacheClient (hit: return)
//!                 │
//!                 ├─► TokenProvider      (client credentials → Token)
//!                 ├─► layers / objectIds (JSON)
//!                 ├─► N chunk queries    (PBF, concurrent)
//!                 ├─► pbf::decode        (per chunk, offset order)
//!                 └─► FeatureCacheClient (best-effort write)
//! ```

pub mod arcgis;
pub mod auth;
pub mod cache;
pub mod config;
pub mod facility;
pub mod feature;
pub mod http;
pub mod logging;
pub mod pbf;
pub mod query;

/// Library version, as declared in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
