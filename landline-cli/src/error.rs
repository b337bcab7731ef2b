//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;
use std::process;

use landline::auth::AuthError;
use landline::cache::CacheError;
use landline::config::ConfigFileError;
use landline::http::HttpError;
use landline::query::QueryError;

/// Exit code used when the user interrupts a command.
const EXIT_INTERRUPTED: i32 = 130;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Async runtime could not start
    Runtime(std::io::Error),
    /// HTTP client could not be built
    Http(HttpError),
    /// Token request failed
    Auth(AuthError),
    /// Geometry cache failure
    Cache(CacheError),
    /// Feature service query failed
    Query(QueryError),
    /// Requested cache entry does not exist
    NotCached(String),
    /// Failed to write output
    Output { target: String, error: std::io::Error },
    /// Failed to serialize output
    Serialize(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Auth(AuthError::MissingCredentials(_))
            | CliError::Query(QueryError::Auth(AuthError::MissingCredentials(_))) => {
                eprintln!();
                eprintln!("Register an application in ArcGIS Online and export its credentials:");
                eprintln!("  export AGOL_CLIENT_ID=<client id>");
                eprintln!("  export AGOL_CLIENT_SECRET=<client secret>");
            }
            CliError::Query(QueryError::LayerResolution(_)) => {
                eprintln!();
                eprintln!("List the service's layers with: landline layers <service>");
                eprintln!("then pass one with --layer-id.");
            }
            CliError::Query(QueryError::Timeout { .. }) => {
                eprintln!();
                eprintln!("Raise [query] timeout in the config file (0 disables it).");
            }
            CliError::Query(error) if error.is_transient() => {
                eprintln!();
                eprintln!("This looks temporary; try again shortly.");
            }
            CliError::Cache(CacheError::Migration(_)) => {
                eprintln!();
                eprintln!("Point [cache] directory in the config file at an empty or");
                eprintln!("landline-only folder.");
            }
            CliError::NotCached(_) => {
                eprintln!();
                eprintln!("See cached keys with: landline cache list");
            }
            _ => {}
        }

        if matches!(self, CliError::Query(QueryError::Cancelled(_))) {
            process::exit(EXIT_INTERRUPTED)
        }
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Http(e) => write!(f, "{}", e),
            CliError::Auth(e) => write!(f, "Authentication failed: {}", e),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::Query(e) => write!(f, "Query failed: {}", e),
            CliError::NotCached(key) => write!(f, "No cached collection named '{}'", key),
            CliError::Output { target, error } => {
                write!(f, "Failed to write '{}': {}", target, error)
            }
            CliError::Serialize(e) => write!(f, "Failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Http(e) => Some(e),
            CliError::Auth(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Query(e) => Some(e),
            CliError::Output { error, .. } => Some(error),
            CliError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::Http(e)
    }
}

impl From<AuthError> for CliError {
    fn from(e: AuthError) -> Self {
        CliError::Auth(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_cached_message_names_key() {
        let error = CliError::NotCached("trails-null".to_string());
        assert_eq!(error.to_string(), "No cached collection named 'trails-null'");
    }

    #[test]
    fn test_query_error_is_source() {
        use std::error::Error;

        let error: CliError = QueryError::Cancelled("trails-null".to_string()).into();
        assert!(error.source().is_some());
        assert!(error.to_string().starts_with("Query failed"));
    }
}
