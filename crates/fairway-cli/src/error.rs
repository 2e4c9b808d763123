//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

use fairway_core::{ErrorDescriptor, ValidationError};

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from fairway-core library
    #[error("Core error: {0}")]
    Core(#[from] fairway_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API key missing
    #[error("API key required. Set --api-key or GOLF_GENIUS_API_KEY")]
    ApiKeyMissing,

    /// Tool arguments rejected before any request was made
    #[error("Invalid tool input: {0}")]
    Validation(#[from] ValidationError),

    /// The upstream call itself failed
    #[error("{0}")]
    Tool(ErrorDescriptor),

    /// Health check did not come back ok
    #[error("Upstream unhealthy: {message}")]
    Unhealthy { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::ApiKeyMissing => 9,
            Self::Validation(_) => 6,
            Self::Tool(_) => 10,
            Self::Unhealthy { .. } => 11,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::Validation(ValidationError::UnknownTool { .. }))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairway_core::ErrorKind;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            Error::Io(io::Error::new(io::ErrorKind::Other, "disk")),
            Error::Core(fairway_core::Error::configuration("bad")),
            Error::FileNotFound {
                path: PathBuf::from("args.json"),
            },
            Error::config("bad"),
            Error::ApiKeyMissing,
            Error::Validation(ValidationError::NoFields),
            Error::Tool(ErrorDescriptor::new(ErrorKind::NotFoundError, Some(404), "gone")),
            Error::Unhealthy {
                message: "down".to_string(),
            },
            Error::other("other"),
        ];

        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(codes.iter().all(|code| *code != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_tool_error_display() {
        let error = Error::Tool(ErrorDescriptor::new(
            ErrorKind::AuthenticationError,
            Some(401),
            "Invalid or expired API key.",
        ));
        assert_eq!(
            format_error(&error, false),
            "Error: AuthenticationError [401]: Invalid or expired API key."
        );
    }

    #[test]
    fn test_unknown_tool_shows_help() {
        let error = Error::Validation(ValidationError::UnknownTool {
            name: "nope".to_string(),
        });
        assert!(error.should_show_help());
        assert!(!Error::ApiKeyMissing.should_show_help());
    }
}
