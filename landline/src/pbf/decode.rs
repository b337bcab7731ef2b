//! Decoding of `f=pbf` query responses

use prost::Message;
use serde_json::{Number, Value as JsonValue};
use thiserror::Error;
use tracing::{trace, warn};

use super::geometry::{to_geojson, Dequantizer};
use super::proto::{self, feature::CompressedGeometry, query_result::Results, value::ValueType};
use super::proto::GeometryType;
use crate::feature::{Feature, Properties};

/// Errors raised while decoding a PBF response.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a valid protocol buffer.
    #[error("invalid protocol buffer: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// The message carries no query result.
    #[error("response has no query result")]
    MissingQueryResult,

    /// A different result kind than the one asked for.
    #[error("expected a {expected} result, found a {found} result")]
    UnexpectedResult {
        expected: &'static str,
        found: &'static str,
    },

    /// A geometry kind that has no GeoJSON mapping.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Coordinates inconsistent with the declared layout.
    #[error("malformed geometry: {0}")]
    Geometry(String),

    /// A feature carries more attribute values than there are fields.
    #[error("feature has {attributes} attributes but the result declares {fields} fields")]
    AttributeMismatch { attributes: usize, fields: usize },
}

/// Features decoded from one chunk response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedChunk {
    pub features: Vec<Feature>,
    pub object_id_field: Option<String>,
    pub exceeded_transfer_limit: bool,
}

fn result_kind(results: &Results) -> &'static str {
    match results {
        Results::FeatureResult(_) => "feature",
        Results::CountResult(_) => "count",
        Results::IdsResult(_) => "object id",
    }
}

fn query_results(bytes: &[u8]) -> Result<Results, DecodeError> {
    let message = proto::FeatureCollectionPBuffer::decode(bytes)?;
    message
        .query_result
        .and_then(|r| r.results)
        .ok_or(DecodeError::MissingQueryResult)
}

/// Decodes a feature query response into GeoJSON features.
pub fn decode(bytes: &[u8]) -> Result<DecodedChunk, DecodeError> {
    let result = match query_results(bytes)? {
        Results::FeatureResult(result) => result,
        other => {
            return Err(DecodeError::UnexpectedResult {
                expected: "feature",
                found: result_kind(&other),
            })
        }
    };

    if result.exceeded_transfer_limit {
        warn!(
            features = result.features.len(),
            "Server truncated the chunk (exceededTransferLimit)"
        );
    }

    let geometry_type = GeometryType::try_from(result.geometry_type).map_err(|_| {
        DecodeError::UnsupportedGeometry(format!("geometry type {}", result.geometry_type))
    })?;
    let dequantizer = Dequantizer::new(result.transform.as_ref(), result.has_z, result.has_m);
    let object_id_field =
        Some(result.object_id_field_name.clone()).filter(|name| !name.is_empty());

    let features = result
        .features
        .iter()
        .map(|feature| {
            decode_feature(
                feature,
                &result.fields,
                object_id_field.as_deref(),
                geometry_type,
                &dequantizer,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    trace!(
        features = features.len(),
        geometry_type = ?geometry_type,
        "Decoded PBF chunk"
    );

    Ok(DecodedChunk {
        features,
        object_id_field,
        exceeded_transfer_limit: result.exceeded_transfer_limit,
    })
}

/// Decodes a `returnCountOnly` response.
pub fn decode_count(bytes: &[u8]) -> Result<u64, DecodeError> {
    match query_results(bytes)? {
        Results::CountResult(result) => Ok(result.count),
        other => Err(DecodeError::UnexpectedResult {
            expected: "count",
            found: result_kind(&other),
        }),
    }
}

/// Decodes a `returnIdsOnly` response.
pub fn decode_object_ids(bytes: &[u8]) -> Result<Vec<u64>, DecodeError> {
    match query_results(bytes)? {
        Results::IdsResult(result) => Ok(result.object_ids),
        other => Err(DecodeError::UnexpectedResult {
            expected: "object id",
            found: result_kind(&other),
        }),
    }
}

fn decode_feature(
    feature: &proto::Feature,
    fields: &[proto::Field],
    object_id_field: Option<&str>,
    geometry_type: GeometryType,
    dequantizer: &Dequantizer,
) -> Result<Feature, DecodeError> {
    if feature.attributes.len() > fields.len() {
        return Err(DecodeError::AttributeMismatch {
            attributes: feature.attributes.len(),
            fields: fields.len(),
        });
    }

    let mut properties = Properties::new();
    let mut id = None;
    for (index, field) in fields.iter().enumerate() {
        let value = feature
            .attributes
            .get(index)
            .map_or(JsonValue::Null, attribute_value);

        if object_id_field == Some(field.name.as_str()) {
            id = value.as_u64();
        }
        properties.insert(field.name.clone(), value);
    }

    let geometry = match &feature.compressed_geometry {
        Some(CompressedGeometry::Geometry(geometry)) => {
            to_geojson(geometry_type, geometry, dequantizer)?
        }
        Some(CompressedGeometry::ShapeBuffer(_)) => {
            return Err(DecodeError::UnsupportedGeometry(
                "Esri shape buffer".to_string(),
            ))
        }
        None => None,
    };

    let mut decoded = Feature::new(geometry, properties);
    decoded.id = id;
    Ok(decoded)
}

fn float_value(value: f64) -> JsonValue {
    Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
}

fn attribute_value(value: &proto::Value) -> JsonValue {
    match &value.value_type {
        Some(ValueType::StringValue(s)) => JsonValue::String(s.clone()),
        Some(ValueType::FloatValue(f)) => float_value(f64::from(*f)),
        Some(ValueType::DoubleValue(d)) => float_value(*d),
        Some(ValueType::SintValue(i)) => JsonValue::from(*i),
        Some(ValueType::UintValue(u)) => JsonValue::from(*u),
        Some(ValueType::Int64Value(i)) | Some(ValueType::Sint64Value(i)) => JsonValue::from(*i),
        Some(ValueType::Uint64Value(u)) => JsonValue::from(*u),
        Some(ValueType::BoolValue(b)) => JsonValue::Bool(*b),
        None => JsonValue::Null,
    }
}
