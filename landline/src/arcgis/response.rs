//! JSON response envelopes returned by ArcGIS REST endpoints.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while building requests or reading JSON responses.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The service answered with an `{"error": {...}}` body.
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    /// The body was not the JSON document expected.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A request URL could not be built.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Error object embedded in ArcGIS JSON responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Deserialize)]
struct Envelope {
    error: Option<ServiceErrorBody>,
}

/// Parses an ArcGIS JSON body, surfacing embedded service errors.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ResponseError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| ResponseError::Malformed(e.to_string()))?;

    if let Some(error) = envelope.error {
        let message = if error.details.is_empty() {
            error.message
        } else {
            format!("{} ({})", error.message, error.details.join("; "))
        };
        return Err(ResponseError::Service {
            code: error.code,
            message,
        });
    }

    serde_json::from_slice(body).map_err(|e| ResponseError::Malformed(e.to_string()))
}

/// Body of a `returnIdsOnly=true` query.
///
/// ArcGIS returns `"objectIds": null` for an empty layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectIdsResponse {
    #[serde(rename = "objectIdFieldName")]
    pub object_id_field_name: Option<String>,
    #[serde(rename = "objectIds")]
    pub object_ids: Option<Vec<u64>>,
}

impl ObjectIdsResponse {
    /// Number of object ids returned.
    pub fn count(&self) -> u64 {
        self.object_ids.as_ref().map_or(0, |ids| ids.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ids_count() {
        let body = br#"{"objectIdFieldName":"ObjectId","objectIds":[1,2,3,5]}"#;
        let response: ObjectIdsResponse = parse_json(body).unwrap();
        assert_eq!(response.count(), 4);
        assert_eq!(response.object_id_field_name.as_deref(), Some("ObjectId"));
    }

    #[test]
    fn test_null_object_ids_count_as_zero() {
        let body = br#"{"objectIdFieldName":"ObjectId","objectIds":null}"#;
        let response: ObjectIdsResponse = parse_json(body).unwrap();
        assert_eq!(response.count(), 0);
    }

    #[test]
    fn test_embedded_error_is_surfaced() {
        let body = br#"{"error":{"code":498,"message":"Invalid token.","details":[]}}"#;
        let result: Result<ObjectIdsResponse, _> = parse_json(body);
        match result {
            Err(ResponseError::Service { code, message }) => {
                assert_eq!(code, 498);
                assert_eq!(message, "Invalid token.");
            }
            other => panic!("Expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_details_are_appended() {
        let body = br#"{"error":{"code":400,"message":"Unable to complete operation.","details":["Invalid where clause"]}}"#;
        let result: Result<ObjectIdsResponse, _> = parse_json(body);
        match result {
            Err(ResponseError::Service { message, .. }) => {
                assert!(message.contains("Invalid where clause"));
            }
            other => panic!("Expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_is_malformed() {
        let result: Result<ObjectIdsResponse, _> = parse_json(b"<html>502</html>");
        assert!(matches!(result, Err(ResponseError::Malformed(_))));
    }
}
