//! Transport error types

use std::fmt;

/// Errors that can occur while talking to a remote endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// The HTTP client could not be constructed
    ClientBuild(String),
    /// The request could not be sent or no response arrived
    RequestFailed(String),
    /// The server answered with a non-success status
    Status { status: u16, url: String },
    /// The response body could not be read
    BodyRead(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::ClientBuild(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            HttpError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            HttpError::Status { status, url } => write!(f, "HTTP {} from {}", status, url),
            HttpError::BodyRead(msg) => write!(f, "Failed to read response: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_includes_url() {
        let err = HttpError::Status {
            status: 498,
            url: "https://services.arcgis.com/x".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("498"));
        assert!(text.contains("services.arcgis.com"));
    }

    #[test]
    fn test_request_failed_display() {
        let err = HttpError::RequestFailed("Connection refused".to_string());
        assert_eq!(err.to_string(), "Request failed: Connection refused");
    }
}
