//! Error types for the Fairway core library
//!
//! These errors cover construction and configuration of the request execution
//! layer. Failures of an individual API call are never raised through this
//! type; they are returned as [`crate::ApiResult::Failure`].

use thiserror::Error;

/// Main error type for Fairway core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// HTTP client construction errors
    #[error("HTTP client error: {message}")]
    HttpClient {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A value that cannot be used as an identifier
    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::configuration("api_key is required");
        assert_eq!(err.to_string(), "Configuration error: api_key is required");

        let err = Error::InvalidIdentifier {
            value: "12a".to_string(),
            reason: "must contain only ASCII digits".to_string(),
        };
        assert!(err.to_string().contains("12a"));
    }

    #[test]
    fn test_http_client_error_keeps_source() {
        let err = Error::HttpClient {
            message: "Failed to build HTTP client".to_string(),
            source: Some(anyhow::anyhow!("tls backend unavailable")),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("tls backend unavailable"));
    }

    #[test]
    fn test_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json { .. }));
    }
}
