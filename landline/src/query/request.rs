//! Query request parameters

use crate::auth::Token;
use crate::cache::cache_key;

/// Layer key used when neither a layer name nor an id was given.
pub const UNSPECIFIED_LAYER_KEY: &str = "null";

/// One feature service query.
///
/// ```
/// use landline::query::QueryRequest;
///
/// let request = QueryRequest::new("trails").with_layer_id(0).with_force(true);
/// assert_eq!(request.cache_key(), "trails-0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub service_name: String,
    /// Token to use instead of asking the provider, while still usable.
    pub token: Option<Token>,
    pub layer_id: Option<u32>,
    pub layer_name: Option<String>,
    /// Known record count; skips the object-id query.
    pub count: Option<u64>,
    /// Bypass the cache read and always refetch.
    pub force: bool,
}

impl QueryRequest {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            token: None,
            layer_id: None,
            layer_name: None,
            count: None,
            force: false,
        }
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_layer_id(mut self, layer_id: u32) -> Self {
        self.layer_id = Some(layer_id);
        self
    }

    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = Some(layer_name.into());
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// The layer component of the cache key: the name if given, else the
    /// id, else `"null"`.
    pub fn layer_key(&self) -> String {
        match (&self.layer_name, self.layer_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => UNSPECIFIED_LAYER_KEY.to_string(),
        }
    }

    pub fn cache_key(&self) -> String {
        cache_key(&self.service_name, &self.layer_key())
    }
}
