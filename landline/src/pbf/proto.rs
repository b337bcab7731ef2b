//! Esri `FeatureCollectionPBuffer` message definitions.
//!
//! Written in the shape `prost-build` generates, restricted to the fields
//! the decoder reads. Fields not declared here are skipped on decode.

/// Top-level message of an `f=pbf` query response.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeatureCollectionPBuffer {
    #[prost(string, tag = "1")]
    pub version: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub query_result: ::core::option::Option<QueryResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResult {
    #[prost(oneof = "query_result::Results", tags = "1, 2, 3")]
    pub results: ::core::option::Option<query_result::Results>,
}

pub mod query_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Results {
        #[prost(message, tag = "1")]
        FeatureResult(super::FeatureResult),
        #[prost(message, tag = "2")]
        CountResult(super::CountResult),
        #[prost(message, tag = "3")]
        IdsResult(super::ObjectIdsResult),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeatureResult {
    #[prost(string, tag = "1")]
    pub object_id_field_name: ::prost::alloc::string::String,
    #[prost(enumeration = "GeometryType", tag = "7")]
    pub geometry_type: i32,
    #[prost(message, optional, tag = "8")]
    pub spatial_reference: ::core::option::Option<SpatialReference>,
    #[prost(bool, tag = "9")]
    pub exceeded_transfer_limit: bool,
    #[prost(bool, tag = "10")]
    pub has_z: bool,
    #[prost(bool, tag = "11")]
    pub has_m: bool,
    #[prost(message, optional, tag = "12")]
    pub transform: ::core::option::Option<Transform>,
    #[prost(message, repeated, tag = "13")]
    pub fields: ::prost::alloc::vec::Vec<Field>,
    #[prost(message, repeated, tag = "15")]
    pub features: ::prost::alloc::vec::Vec<Feature>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CountResult {
    #[prost(uint64, tag = "1")]
    pub count: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ObjectIdsResult {
    #[prost(string, tag = "1")]
    pub object_id_field_name: ::prost::alloc::string::String,
    #[prost(uint64, repeated, tag = "3")]
    pub object_ids: ::prost::alloc::vec::Vec<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SpatialReference {
    #[prost(uint32, tag = "1")]
    pub wkid: u32,
    #[prost(uint32, tag = "2")]
    pub lastest_wkid: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Field {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(enumeration = "FieldType", tag = "2")]
    pub field_type: i32,
    #[prost(string, tag = "3")]
    pub alias: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Value {
    #[prost(oneof = "value::ValueType", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9")]
    pub value_type: ::core::option::Option<value::ValueType>,
}

pub mod value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum ValueType {
        #[prost(string, tag = "1")]
        StringValue(::prost::alloc::string::String),
        #[prost(float, tag = "2")]
        FloatValue(f32),
        #[prost(double, tag = "3")]
        DoubleValue(f64),
        #[prost(sint32, tag = "4")]
        SintValue(i32),
        #[prost(uint32, tag = "5")]
        UintValue(u32),
        #[prost(int64, tag = "6")]
        Int64Value(i64),
        #[prost(uint64, tag = "7")]
        Uint64Value(u64),
        #[prost(sint64, tag = "8")]
        Sint64Value(i64),
        #[prost(bool, tag = "9")]
        BoolValue(bool),
    }
}

/// Quantized geometry: part lengths plus zig-zag delta coordinates.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Geometry {
    #[prost(uint32, repeated, tag = "2")]
    pub lengths: ::prost::alloc::vec::Vec<u32>,
    #[prost(sint64, repeated, tag = "3")]
    pub coords: ::prost::alloc::vec::Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EsriShapeBuffer {
    #[prost(bytes = "vec", tag = "1")]
    pub bytes: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Feature {
    #[prost(message, repeated, tag = "1")]
    pub attributes: ::prost::alloc::vec::Vec<Value>,
    #[prost(oneof = "feature::CompressedGeometry", tags = "2, 3")]
    pub compressed_geometry: ::core::option::Option<feature::CompressedGeometry>,
    #[prost(message, optional, tag = "4")]
    pub centroid: ::core::option::Option<Geometry>,
}

pub mod feature {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum CompressedGeometry {
        #[prost(message, tag = "2")]
        Geometry(super::Geometry),
        #[prost(message, tag = "3")]
        ShapeBuffer(super::EsriShapeBuffer),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Scale {
    #[prost(double, tag = "1")]
    pub x_scale: f64,
    #[prost(double, tag = "2")]
    pub y_scale: f64,
    #[prost(double, tag = "3")]
    pub m_scale: f64,
    #[prost(double, tag = "4")]
    pub z_scale: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Translate {
    #[prost(double, tag = "1")]
    pub x_translate: f64,
    #[prost(double, tag = "2")]
    pub y_translate: f64,
    #[prost(double, tag = "3")]
    pub m_translate: f64,
    #[prost(double, tag = "4")]
    pub z_translate: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transform {
    #[prost(enumeration = "QuantizeOriginPostion", tag = "1")]
    pub quantize_origin_postion: i32,
    #[prost(message, optional, tag = "2")]
    pub scale: ::core::option::Option<Scale>,
    #[prost(message, optional, tag = "3")]
    pub translate: ::core::option::Option<Translate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum GeometryType {
    Point = 0,
    Multipoint = 1,
    Polyline = 2,
    Polygon = 3,
    Multipatch = 4,
    Absent = 127,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FieldType {
    EsriFieldTypeSmallInteger = 0,
    EsriFieldTypeInteger = 1,
    EsriFieldTypeSingle = 2,
    EsriFieldTypeDouble = 3,
    EsriFieldTypeString = 4,
    EsriFieldTypeDate = 5,
    EsriFieldTypeOid = 6,
    EsriFieldTypeGeometry = 7,
    EsriFieldTypeBlob = 8,
    EsriFieldTypeRaster = 9,
    EsriFieldTypeGuid = 10,
    EsriFieldTypeGlobalId = 11,
    EsriFieldTypeXml = 12,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum QuantizeOriginPostion {
    UpperLeft = 0,
    LowerLeft = 1,
}
