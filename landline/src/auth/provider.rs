//! Token providers consumed by the query orchestrator

use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use super::token::{authenticate, Token, DEFAULT_TOKEN_EXPIRATION};
use super::{AuthError, Credentials};
use crate::http::AsyncHttpClient;

/// Source of access tokens.
pub trait TokenProvider: Send + Sync {
    /// Returns a token to attach to service requests.
    fn token(&self) -> impl Future<Output = Result<Token, AuthError>> + Send;
}

/// Authenticates with fixed credentials on every call.
pub struct ClientCredentialsProvider<C: AsyncHttpClient> {
    client: C,
    token_url: String,
    credentials: Credentials,
    expiration: u32,
}

impl<C: AsyncHttpClient> ClientCredentialsProvider<C> {
    pub fn new(client: C, token_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            credentials,
            expiration: DEFAULT_TOKEN_EXPIRATION,
        }
    }

    /// Overrides the requested token expiration.
    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = expiration;
        self
    }
}

impl<C: AsyncHttpClient> TokenProvider for ClientCredentialsProvider<C> {
    async fn token(&self) -> Result<Token, AuthError> {
        authenticate(
            &self.client,
            &self.token_url,
            &self.credentials,
            self.expiration,
        )
        .await
    }
}

/// Authenticates with credentials read from the environment on each call.
///
/// Missing variables surface when a token is first needed, not at
/// construction, so cached queries work without credentials.
pub struct EnvCredentialsProvider<C: AsyncHttpClient> {
    client: C,
    token_url: String,
    expiration: u32,
}

impl<C: AsyncHttpClient> EnvCredentialsProvider<C> {
    pub fn new(client: C, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            expiration: DEFAULT_TOKEN_EXPIRATION,
        }
    }

    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = expiration;
        self
    }
}

impl<C: AsyncHttpClient> TokenProvider for EnvCredentialsProvider<C> {
    async fn token(&self) -> Result<Token, AuthError> {
        let credentials = Credentials::from_env()?;
        authenticate(&self.client, &self.token_url, &credentials, self.expiration).await
    }
}

/// Holds the last token of an inner provider until it stops being usable.
pub struct CachingTokenProvider<P: TokenProvider> {
    inner: P,
    current: Mutex<Option<Token>>,
}

impl<P: TokenProvider> CachingTokenProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            current: Mutex::new(None),
        }
    }

    /// Drops the held token so the next call authenticates again.
    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }
}

impl<P: TokenProvider> TokenProvider for CachingTokenProvider<P> {
    async fn token(&self) -> Result<Token, AuthError> {
        // Held across the refresh so concurrent callers share one request.
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            if token.is_usable() {
                return Ok(token.clone());
            }
            debug!(expires_at = %token.expires_at(), "Cached access token expired, refreshing");
        }

        let token = self.inner.token().await?;
        *current = Some(token.clone());
        Ok(token)
    }
}

/// Serves one caller-supplied token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: Token,
}

impl StaticTokenProvider {
    pub fn new(token: Token) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<Token, AuthError> {
        if self.token.is_usable() {
            Ok(self.token.clone())
        } else {
            Err(AuthError::Expired)
        }
    }
}
