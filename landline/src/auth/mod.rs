//! ArcGIS Online authentication.
//!
//! Client-credentials OAuth2: a `client_id`/`client_secret` pair is
//! exchanged for a short-lived access token that every feature service
//! request carries as its `token` parameter.
//!
//! # Components
//!
//! - [`Credentials`]: the id/secret pair, loadable from the environment
//! - [`authenticate`]: one token request against the OAuth endpoint
//! - [`TokenProvider`]: the capability the query orchestrator consumes
//! - [`CachingTokenProvider`]: reuses a token until it is about to expire

mod credentials;
mod provider;
mod token;

use thiserror::Error;

use crate::http::HttpError;

pub use credentials::{Credentials, CLIENT_ID_ENV, CLIENT_SECRET_ENV};
pub use provider::{
    CachingTokenProvider, ClientCredentialsProvider, EnvCredentialsProvider, StaticTokenProvider,
    TokenProvider,
};
pub use token::{
    authenticate, authenticate_from_env, Token, DEFAULT_TOKEN_EXPIRATION, EXPIRY_SKEW_SECS,
};

/// Errors that can occur while obtaining an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client id or secret absent or empty.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// The token request never got a successful HTTP answer.
    #[error("token request failed: {0}")]
    Http(#[from] HttpError),

    /// The OAuth endpoint answered with an error body.
    #[error("token request rejected ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// The OAuth endpoint answered with something other than a token.
    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    /// The token URL could not be built.
    #[error("invalid token URL: {0}")]
    InvalidUrl(String),

    /// A caller-supplied token is past its expiry and cannot be renewed.
    #[error("access token expired")]
    Expired,
}
