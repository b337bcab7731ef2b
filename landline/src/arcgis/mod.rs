//! ArcGIS Online feature service endpoints and JSON responses.
//!
//! # URL Pattern
//!
//! `https://services.arcgis.com/{org_id}/arcgis/rest/services/{service}/FeatureServer/{layer}`
//!
//! Layer metadata and object-id queries return JSON (`f=pjson`); geometry
//! queries return Esri PBF (`f=pbf`), decoded by [`crate::pbf`].
//!
//! ArcGIS reports many failures as HTTP 200 with an `{"error": {...}}`
//! body, so every JSON response goes through [`parse_json`].

mod endpoint;
mod layers;
mod response;

pub use endpoint::{
    ServiceEndpoint, DEFAULT_ORG_ID, DEFAULT_OUT_SR, DEFAULT_SERVICES_HOST, DEFAULT_TOKEN_URL,
};
pub use layers::{resolve_layer, LayerInfo, LayerResolutionError, LayersResponse};
pub use response::{parse_json, ObjectIdsResponse, ResponseError, ServiceErrorBody};
