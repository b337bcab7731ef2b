//! Access tokens and the client-credentials token request

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, error};

use super::{AuthError, Credentials};
use crate::arcgis::{parse_json, ResponseError};
use crate::http::AsyncHttpClient;

/// Value sent as the `expiration` parameter of token requests.
///
/// ArcGIS reads it as minutes and caps it to the application's limit; the
/// lifetime actually granted comes back as `expires_in`.
pub const DEFAULT_TOKEN_EXPIRATION: u32 = 3600;

/// A token stops being usable this many seconds before its expiry.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// An ArcGIS access token with its expiry instant.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// A token issued now that lives for `expires_in_secs`.
    pub fn issued_now(access_token: impl Into<String>, expires_in_secs: i64) -> Self {
        Self::new(access_token, Utc::now() + Duration::seconds(expires_in_secs))
    }

    /// The raw token string sent to services.
    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token can still be sent, allowing for clock skew.
    pub fn is_usable(&self) -> bool {
        self.is_usable_at(Utc::now())
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) < self.expires_at
    }

    /// Seconds until expiry, negative once expired.
    pub fn remaining_secs(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

fn token_request_url(
    token_url: &str,
    credentials: &Credentials,
    expiration: u32,
) -> Result<Url, AuthError> {
    let expiration = expiration.to_string();
    Url::parse_with_params(
        token_url,
        &[
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
            ("grant_type", "client_credentials"),
            ("expiration", expiration.as_str()),
        ],
    )
    .map_err(|e| AuthError::InvalidUrl(format!("{}: {}", token_url, e)))
}

/// Exchanges client credentials for an access token.
///
/// Issues a single POST with every parameter in the query string. Failures
/// are logged and returned; nothing is retried.
pub async fn authenticate<C: AsyncHttpClient>(
    client: &C,
    token_url: &str,
    credentials: &Credentials,
    expiration: u32,
) -> Result<Token, AuthError> {
    let url = token_request_url(token_url, credentials, expiration)?;
    debug!(token_url = token_url, client_id = credentials.client_id(), "Requesting access token");

    let body = client.post(url.as_str()).await.map_err(|e| {
        error!(token_url = token_url, error = %e, "Token request failed");
        AuthError::Http(e)
    })?;

    let response: TokenResponse = parse_json(&body).map_err(|e| {
        error!(token_url = token_url, error = %e, "Token request rejected");
        match e {
            ResponseError::Service { code, message } => AuthError::Rejected { code, message },
            other => AuthError::MalformedResponse(other.to_string()),
        }
    })?;

    let access_token = match response.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            error!(token_url = token_url, "Token response has no access_token");
            return Err(AuthError::MalformedResponse(
                "response has no access_token".to_string(),
            ));
        }
    };

    // Absent expires_in: trust the requested lifetime.
    let expires_in = response
        .expires_in
        .unwrap_or(i64::from(expiration) * 60);

    debug!(expires_in = expires_in, "Access token issued");
    Ok(Token::issued_now(access_token, expires_in))
}

/// Authenticates with credentials taken from the environment.
pub async fn authenticate_from_env<C: AsyncHttpClient>(
    client: &C,
    token_url: &str,
) -> Result<Token, AuthError> {
    let credentials = Credentials::from_env()?;
    authenticate(client, token_url, &credentials, DEFAULT_TOKEN_EXPIRATION).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpError, MockAsyncHttpClient};

    const TOKEN_URL: &str = "https://www.arcgis.com/sharing/rest/oauth2/token";

    fn creds() -> Credentials {
        Credentials::new("app-id", "s3cr&t").unwrap()
    }

    #[test]
    fn test_usable_respects_skew() {
        let now = Utc::now();
        let token = Token::new("t", now + Duration::seconds(EXPIRY_SKEW_SECS + 5));
        assert!(token.is_usable_at(now));
        assert!(!token.is_usable_at(now + Duration::seconds(10)));

        let expired = Token::new("t", now - Duration::seconds(1));
        assert!(!expired.is_usable_at(now));
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let token = Token::issued_now("very-secret-token", 3600);
        assert!(!format!("{:?}", token).contains("very-secret-token"));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mock = MockAsyncHttpClient::new().route(
            "oauth2/token",
            Ok(br#"{"access_token":"abc123","expires_in":7200}"#.to_vec()),
        );

        let token = authenticate(&mock, TOKEN_URL, &creds(), DEFAULT_TOKEN_EXPIRATION)
            .await
            .unwrap();

        assert_eq!(token.as_str(), "abc123");
        assert!(token.is_usable());
        assert!(token.remaining_secs() > 7000);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert!(requests[0].url.contains("client_id=app-id"));
        assert!(requests[0].url.contains("client_secret=s3cr%26t"));
        assert!(requests[0].url.contains("grant_type=client_credentials"));
        assert!(requests[0].url.contains("expiration=3600"));
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let mock = MockAsyncHttpClient::new().route(
            "oauth2/token",
            Ok(br#"{"error":{"code":400,"message":"Invalid client_id","details":[]}}"#.to_vec()),
        );

        let result = authenticate(&mock, TOKEN_URL, &creds(), 60).await;
        match result {
            Err(AuthError::Rejected { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid client_id");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authenticate_missing_access_token() {
        let mock = MockAsyncHttpClient::new().route("oauth2/token", Ok(br#"{"expires_in":60}"#.to_vec()));

        let result = authenticate(&mock, TOKEN_URL, &creds(), 60).await;
        assert!(matches!(result, Err(AuthError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_authenticate_network_failure() {
        let mock = MockAsyncHttpClient::new().route(
            "oauth2/token",
            Err(HttpError::RequestFailed("connection refused".to_string())),
        );

        let result = authenticate(&mock, TOKEN_URL, &creds(), 60).await;
        assert!(matches!(result, Err(AuthError::Http(_))));
    }

    #[tokio::test]
    async fn test_authenticate_invalid_url() {
        let mock = MockAsyncHttpClient::new();
        let result = authenticate(&mock, "not a url", &creds(), 60).await;
        assert!(matches!(result, Err(AuthError::InvalidUrl(_))));
        assert_eq!(mock.request_count(), 0);
    }
}
