//! Feature service query orchestration.
//!
//! A query is served from the cache when possible. Otherwise the client
//! authenticates, resolves the layer, counts its records, fetches every
//! object-id range concurrently as PBF, decodes the chunks in range order
//! and writes the assembled collection back to the cache.

use std::time::Instant;

use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::chunk::{ChunkPlan, ChunkRange};
use super::config::QueryConfig;
use super::error::QueryError;
use super::request::QueryRequest;
use crate::arcgis::{
    parse_json, resolve_layer, LayerInfo, LayersResponse, ObjectIdsResponse, ServiceEndpoint,
};
use crate::auth::{Token, TokenProvider};
use crate::cache::FeatureCacheClient;
use crate::feature::FeatureCollection;
use crate::http::AsyncHttpClient;
use crate::pbf::{self, DecodedChunk};

/// Fetches, decodes and caches feature service layers.
pub struct FeatureServiceClient<C: AsyncHttpClient, P: TokenProvider> {
    http: C,
    tokens: P,
    cache: FeatureCacheClient,
    config: QueryConfig,
}

impl<C: AsyncHttpClient, P: TokenProvider> FeatureServiceClient<C, P> {
    pub fn new(http: C, tokens: P, cache: FeatureCacheClient, config: QueryConfig) -> Self {
        Self {
            http,
            tokens,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn cache(&self) -> &FeatureCacheClient {
        &self.cache
    }

    /// Returns the layer's features, from the cache unless `request.force`.
    pub async fn query_feature_service(
        &self,
        request: &QueryRequest,
    ) -> Result<FeatureCollection, QueryError> {
        self.query_feature_service_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`query_feature_service`](Self::query_feature_service), aborting
    /// outstanding requests once `cancel` fires.
    pub async fn query_feature_service_with_cancel(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<FeatureCollection, QueryError> {
        let cache_key = request.cache_key();

        if !request.force {
            match self.cache.get(&cache_key).await {
                Ok(Some(collection)) => {
                    info!(key = %cache_key, features = collection.len(), "Serving from cache");
                    return Ok(collection);
                }
                Ok(None) => {}
                Err(e) => warn!(key = %cache_key, error = %e, "Cache read failed, fetching"),
            }
        }

        let started = Instant::now();
        let remote = async {
            match self.config.timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.fetch_collection(request, &cache_key))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(QueryError::Timeout {
                            cache_key: cache_key.clone(),
                            elapsed: started.elapsed(),
                        }),
                    }
                }
                None => self.fetch_collection(request, &cache_key).await,
            }
        };

        let collection = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(key = %cache_key, "Query cancelled");
                return Err(QueryError::Cancelled(cache_key.clone()));
            }
            result = remote => result?,
        };

        if let Err(e) = self.cache.put(&collection).await {
            warn!(key = %cache_key, error = %e, "Failed to write feature cache entry");
        }

        info!(
            key = %cache_key,
            features = collection.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Feature service query complete"
        );
        Ok(collection)
    }

    /// Lists the layers of a service, authenticating through the provider.
    pub async fn list_layers(&self, service_name: &str) -> Result<Vec<LayerInfo>, QueryError> {
        let token = self.tokens.token().await?;
        self.fetch_layers(service_name, &token).await
    }

    async fn fetch_collection(
        &self,
        request: &QueryRequest,
        cache_key: &str,
    ) -> Result<FeatureCollection, QueryError> {
        let token = self.resolve_token(request).await?;
        let layer_id = self.resolve_layer_id(request, &token).await?;
        let layer_url = self.config.endpoint.layer_url(&request.service_name, layer_id);

        let count = match request.count {
            Some(count) => count,
            None => self.count_records(&layer_url, &token).await?,
        };

        let plan = ChunkPlan::new(count, &self.config.chunks);
        debug!(
            key = cache_key,
            layer_url = %layer_url,
            count = count,
            chunk_size = plan.chunk_size,
            chunks = plan.len(),
            "Fetching feature chunks"
        );

        let chunks = try_join_all(
            plan.ranges
                .iter()
                .map(|range| self.fetch_chunk(&layer_url, &token, *range)),
        )
        .await?;

        let features = chunks
            .into_iter()
            .flat_map(|chunk| chunk.features)
            .collect();

        Ok(FeatureCollection::new(cache_key).with_features(features))
    }

    async fn resolve_token(&self, request: &QueryRequest) -> Result<Token, QueryError> {
        if let Some(token) = &request.token {
            if token.is_usable() {
                return Ok(token.clone());
            }
            debug!(expires_at = %token.expires_at(), "Supplied token expired, requesting a new one");
        }
        Ok(self.tokens.token().await?)
    }

    async fn resolve_layer_id(
        &self,
        request: &QueryRequest,
        token: &Token,
    ) -> Result<u32, QueryError> {
        if let Some(layer_id) = request.layer_id {
            return Ok(layer_id);
        }

        let layers = self.fetch_layers(&request.service_name, token).await?;
        let layer = resolve_layer(
            &request.service_name,
            request.layer_name.as_deref(),
            &layers,
        )?;
        debug!(service = %request.service_name, layer_id = layer.id, layer = %layer.name, "Resolved layer");
        Ok(layer.id)
    }

    async fn fetch_layers(
        &self,
        service_name: &str,
        token: &Token,
    ) -> Result<Vec<LayerInfo>, QueryError> {
        let url = self.config.endpoint.layers_url(service_name, token.as_str())?;
        let body = self.http.get(&url).await?;
        let response: LayersResponse = parse_json(&body)?;
        Ok(response.layers)
    }

    async fn count_records(&self, layer_url: &str, token: &Token) -> Result<u64, QueryError> {
        let url = ServiceEndpoint::object_ids_url(layer_url, token.as_str())?;
        let body = self.http.get(&url).await?;
        let response: ObjectIdsResponse = parse_json(&body)?;
        Ok(response.count())
    }

    async fn fetch_chunk(
        &self,
        layer_url: &str,
        token: &Token,
        range: ChunkRange,
    ) -> Result<DecodedChunk, QueryError> {
        let url = ServiceEndpoint::chunk_url(
            layer_url,
            token.as_str(),
            &range.where_clause(),
            &self.config.out_fields,
            self.config.out_sr,
        )?;

        let body = self.http.get_cacheable(&url).await?;
        let chunk = pbf::decode(&body).map_err(|source| QueryError::Decode {
            offset: range.start,
            source,
        })?;

        if chunk.exceeded_transfer_limit {
            warn!(
                start = range.start,
                end = range.end,
                features = chunk.features.len(),
                "Chunk truncated by the server's record limit"
            );
        }
        debug!(start = range.start, end = range.end, features = chunk.features.len(), "Chunk decoded");
        Ok(chunk)
    }
}
