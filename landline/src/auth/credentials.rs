//! Client credentials

use std::fmt;

use tracing::error;

use super::AuthError;

/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_ENV: &str = "AGOL_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_ENV: &str = "AGOL_CLIENT_SECRET";

/// OAuth2 client id and secret of an ArcGIS Online application.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates credentials, rejecting empty values.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(AuthError::MissingCredentials(
                "client id is empty".to_string(),
            ));
        }
        if client_secret.trim().is_empty() {
            return Err(AuthError::MissingCredentials(
                "client secret is empty".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Reads `AGOL_CLIENT_ID` and `AGOL_CLIENT_SECRET` from the process
    /// environment.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the credential variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(CLIENT_ID_ENV).unwrap_or_default();
        let client_secret = lookup(CLIENT_SECRET_ENV).unwrap_or_default();

        if client_id.is_empty() || client_secret.is_empty() {
            error!(
                client_id_set = !client_id.is_empty(),
                client_secret_set = !client_secret.is_empty(),
                "ArcGIS client credentials are not configured"
            );
            return Err(AuthError::MissingCredentials(format!(
                "set {} and {}",
                CLIENT_ID_ENV, CLIENT_SECRET_ENV
            )));
        }

        Self::new(client_id, client_secret)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_new_rejects_empty_values() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(AuthError::MissingCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("id", "  "),
            Err(AuthError::MissingCredentials(_))
        ));
        assert!(Credentials::new("id", "secret").is_ok());
    }

    #[test]
    fn test_from_lookup_reads_both_variables() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_ENV, "app-id"),
            (CLIENT_SECRET_ENV, "app-secret"),
        ]))
        .unwrap();

        assert_eq!(creds.client_id(), "app-id");
        assert_eq!(creds.client_secret(), "app-secret");
    }

    #[test]
    fn test_from_lookup_missing_secret() {
        let result = Credentials::from_lookup(lookup_from(&[(CLIENT_ID_ENV, "app-id")]));
        match result {
            Err(AuthError::MissingCredentials(msg)) => {
                assert!(msg.contains(CLIENT_SECRET_ENV));
            }
            other => panic!("Expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("app-id", "super-secret").unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("app-id"));
        assert!(!debug.contains("super-secret"));
    }
}
