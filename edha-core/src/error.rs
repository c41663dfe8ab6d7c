//! Core error types for the EDHA site client.

use thiserror::Error;

/// Core error type for model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required identifier is missing from a backend record.
    #[error("{0}")]
    MissingIdentifier(String),
}
