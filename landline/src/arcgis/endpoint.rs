//! URL construction for ArcGIS Online feature services.

use reqwest::Url;

use super::response::ResponseError;

/// Host serving hosted feature services for ArcGIS Online organizations.
pub const DEFAULT_SERVICES_HOST: &str = "https://services.arcgis.com";

/// Organization id owning the greenway services.
pub const DEFAULT_ORG_ID: &str = "c5WwApDsDjRhIVkH";

/// OAuth2 client-credentials token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.arcgis.com/sharing/rest/oauth2/token";

/// Output spatial reference requested for geometry (WGS84).
pub const DEFAULT_OUT_SR: u32 = 4326;

/// Location of an organization's hosted feature services.
///
/// # Example
///
/// ```
/// use landline::arcgis::ServiceEndpoint;
///
/// let endpoint = ServiceEndpoint::default();
/// assert!(endpoint.layer_url("trails", 0).ends_with("/trails/FeatureServer/0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    services_host: String,
    org_id: String,
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICES_HOST, DEFAULT_ORG_ID)
    }
}

impl ServiceEndpoint {
    /// Creates an endpoint for `org_id` on `services_host`.
    ///
    /// A trailing slash on the host is ignored.
    pub fn new(services_host: impl Into<String>, org_id: impl Into<String>) -> Self {
        let host: String = services_host.into();
        Self {
            services_host: host.trim_end_matches('/').to_string(),
            org_id: org_id.into(),
        }
    }

    pub fn services_host(&self) -> &str {
        &self.services_host
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Root URL of a feature service.
    pub fn service_url(&self, service_name: &str) -> String {
        format!(
            "{}/{}/arcgis/rest/services/{}/FeatureServer",
            self.services_host, self.org_id, service_name
        )
    }

    /// URL of one layer of a feature service.
    pub fn layer_url(&self, service_name: &str, layer_id: u32) -> String {
        format!("{}/{}", self.service_url(service_name), layer_id)
    }

    /// URL listing the layers of a feature service.
    pub fn layers_url(&self, service_name: &str, token: &str) -> Result<String, ResponseError> {
        let base = format!("{}/layers", self.service_url(service_name));
        build_url(&base, &[("f", "pjson"), ("token", token)])
    }

    /// URL of the object-id-only query used to count a layer's records.
    pub fn object_ids_url(layer_url: &str, token: &str) -> Result<String, ResponseError> {
        let base = format!("{}/query", layer_url);
        build_url(
            &base,
            &[
                ("where", "0=0"),
                ("returnGeometry", "false"),
                ("f", "pjson"),
                ("token", token),
                ("returnIdsOnly", "true"),
            ],
        )
    }

    /// URL of a PBF geometry query restricted by `where_clause`.
    pub fn chunk_url(
        layer_url: &str,
        token: &str,
        where_clause: &str,
        out_fields: &[String],
        out_sr: u32,
    ) -> Result<String, ResponseError> {
        let base = format!("{}/query", layer_url);
        let out_fields = if out_fields.is_empty() {
            "*".to_string()
        } else {
            out_fields.join(",")
        };
        let out_sr = out_sr.to_string();
        build_url(
            &base,
            &[
                ("returnGeometry", "true"),
                ("outSR", out_sr.as_str()),
                ("outFields", out_fields.as_str()),
                ("f", "pbf"),
                ("token", token),
                ("where", where_clause),
            ],
        )
    }
}

fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String, ResponseError> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| ResponseError::InvalidUrl(format!("{}: {}", base, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_url_construction() {
        let endpoint = ServiceEndpoint::default();
        assert_eq!(
            endpoint.layer_url("simplified_muni_polygons_2", 0),
            "https://services.arcgis.com/c5WwApDsDjRhIVkH/arcgis/rest/services/simplified_muni_polygons_2/FeatureServer/0"
        );
    }

    #[test]
    fn test_trailing_slash_on_host_is_ignored() {
        let endpoint = ServiceEndpoint::new("https://example.com/", "org");
        assert_eq!(
            endpoint.service_url("trails"),
            "https://example.com/org/arcgis/rest/services/trails/FeatureServer"
        );
    }

    #[test]
    fn test_layers_url_has_format_and_token() {
        let endpoint = ServiceEndpoint::new("https://example.com", "org");
        let url = endpoint.layers_url("trails", "abc").unwrap();
        assert_eq!(
            url,
            "https://example.com/org/arcgis/rest/services/trails/FeatureServer/layers?f=pjson&token=abc"
        );
    }

    #[test]
    fn test_object_ids_url_requests_ids_only() {
        let url = ServiceEndpoint::object_ids_url("https://example.com/org/x/FeatureServer/3", "t")
            .unwrap();
        assert!(url.starts_with("https://example.com/org/x/FeatureServer/3/query?"));
        assert!(url.contains("returnIdsOnly=true"));
        assert!(url.contains("returnGeometry=false"));
        assert!(url.contains("where=0%3D0"));
    }

    #[test]
    fn test_chunk_url_encodes_where_clause() {
        let url = ServiceEndpoint::chunk_url(
            "https://example.com/org/x/FeatureServer/0",
            "tok",
            "ObjectId>0 and ObjectId<=8334",
            &["muni_id".to_string()],
            4326,
        )
        .unwrap();

        assert!(url.contains("f=pbf"));
        assert!(url.contains("outSR=4326"));
        assert!(url.contains("outFields=muni_id"));
        assert!(url.ends_with("where=ObjectId%3E0+and+ObjectId%3C%3D8334"));
    }

    #[test]
    fn test_chunk_url_defaults_to_all_fields() {
        let url = ServiceEndpoint::chunk_url("https://example.com/0", "t", "1=1", &[], 4326)
            .unwrap();
        assert!(url.contains("outFields=*"));
    }

    #[test]
    fn test_token_is_percent_encoded() {
        let endpoint = ServiceEndpoint::default();
        let url = endpoint.layers_url("trails", "a+b/c=").unwrap();
        assert!(url.ends_with("token=a%2Bb%2Fc%3D"));
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let endpoint = ServiceEndpoint::new("not a url", "org");
        assert!(matches!(
            endpoint.layers_url("trails", "t"),
            Err(ResponseError::InvalidUrl(_))
        ));
    }
}
