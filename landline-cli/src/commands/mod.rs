//! CLI command implementations.
//!
//! - [`fetch`] - Query a layer and print GeoJSON
//! - [`layers`] - List a service's layers
//! - [`token`] - Check credentials by requesting a token
//! - [`summary`] - Facility tallies per service
//! - [`cache`] - Geometry cache management
//! - [`config`] - Configuration file management

pub mod cache;
pub mod common;
pub mod config;
pub mod fetch;
pub mod layers;
pub mod summary;
pub mod token;
