//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for fetch operations.
///
/// Errors carry human-readable messages; callers turn them into status
/// text rather than matching on codes.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response within the deadline. The request was aborted.
    #[error("Request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a failure status.
    ///
    /// Displays exactly the extracted message.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the body, or `HTTP <status>`.
        message: String,
    },

    /// Network unreachable, connection reset, TLS failure...
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Returns true if the request hit its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns the HTTP status for status failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return FetchError::InvalidUrl(err.to_string());
        }
        FetchError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

// ============================================================================
// Config Error
// ============================================================================

/// Error type for configuration loading and resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A URL setting is not a valid absolute URL.
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Parser message.
        reason: String,
    },

    /// IO error while reading the config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
