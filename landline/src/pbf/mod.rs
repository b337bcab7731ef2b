//! Esri PBF feature decoding.
//!
//! ArcGIS feature services answer `f=pbf` queries with a
//! `FeatureCollectionPBuffer` protocol buffer. Geometry is quantized: each
//! coordinate is a zig-zag encoded delta from the previous vertex, scaled
//! and translated by the result's transform.
//!
//! [`decode`] turns one response into GeoJSON-shaped [`Feature`]s.
//!
//! [`Feature`]: crate::feature::Feature

mod decode;
mod geometry;
pub mod proto;

pub use decode::{decode, decode_count, decode_object_ids, DecodeError, DecodedChunk};
pub use geometry::{assemble_polygons, Dequantizer};
