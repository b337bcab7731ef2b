//! GeoJSON-shaped feature model.
//!
//! [`FeatureCollection`] is what queries return and what the cache stores.
//! It serializes to a GeoJSON `FeatureCollection` carrying a `name` (the
//! cache key) and a named CRS member fixed to WGS84.

mod types;

pub use types::{
    CollectionKind, Crs, CrsKind, CrsProperties, Feature, FeatureCollection, FeatureKind,
    Geometry, Position, Properties, WGS84_CRS_NAME,
};
