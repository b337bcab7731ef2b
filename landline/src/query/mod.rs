//! Feature service query orchestration.
//!
//! [`FeatureServiceClient`] ties the pieces together:
//!
//! ```text
//! QueryRequest ──► cache hit? ──yes──► FeatureCollection
//!                     │ no
//!                     ▼
//!               token ─► layer id ─► record count ─► ChunkPlan
//!                                                      │
//!                  ┌───────────────┬───────────────────┤
//!                  ▼               ▼                   ▼
//!               chunk 0         chunk 1      ...    chunk n   (concurrent)
//!                  └───────────────┴─────────┬─────────┘
//!                                            ▼
//!                           decode + concatenate in range order
//!                                            ▼
//!                               cache write (best effort)
//! ```
//!
//! Any chunk failure fails the whole query; nothing is retried.

mod chunk;
mod config;
mod error;
mod orchestrator;
mod request;

pub use chunk::{
    ChunkConfig, ChunkPlan, ChunkRange, DEFAULT_CHUNK_DIVISOR, DEFAULT_MAX_CHUNK_SIZE,
    OBJECT_ID_FIELD,
};
pub use config::{QueryConfig, DEFAULT_QUERY_TIMEOUT};
pub use error::QueryError;
pub use orchestrator::FeatureServiceClient;
pub use request::{QueryRequest, UNSPECIFIED_LAYER_KEY};
