//! Error types for wikirelay.

use thiserror::Error;

/// Result type alias using wikirelay's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wikirelay operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input from the caller (missing required field etc.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-2xx response from the content platform. Carries the upstream
    /// status, status text, and the best-effort parsed error body.
    #[error("Upstream API error {status} {status_text}")]
    Upstream {
        status: u16,
        status_text: String,
        details: serde_json::Value,
    },

    /// Text-generation call failed or returned an unusable response
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed before a status was received
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Upstream HTTP status, when this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("Title is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: Title is required");
    }

    #[test]
    fn test_error_display_upstream() {
        let err = Error::Upstream {
            status: 404,
            status_text: "Not Found".to_string(),
            details: serde_json::json!({"message": "no such page"}),
        };
        assert_eq!(err.to_string(), "Upstream API error 404 Not Found");
    }

    #[test]
    fn test_error_display_inference() {
        let err = Error::Inference("model timeout".to_string());
        assert_eq!(err.to_string(), "Inference error: model timeout");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("CONFLUENCE_BASE_URL is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: CONFLUENCE_BASE_URL is not set"
        );
    }

    #[test]
    fn test_error_display_request() {
        let err = Error::Request("network unreachable".to_string());
        assert_eq!(err.to_string(), "Request error: network unreachable");
    }

    #[test]
    fn test_upstream_status_accessor() {
        let err = Error::Upstream {
            status: 409,
            status_text: "Conflict".to_string(),
            details: serde_json::Value::Null,
        };
        assert_eq!(err.upstream_status(), Some(409));
        assert_eq!(Error::Internal("x".to_string()).upstream_status(), None);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
