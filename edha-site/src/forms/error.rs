//! Form submission errors.

use edha_fetch::FetchError;
use thiserror::Error;

use crate::messages;

/// Why a submission ended in `Failed`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The target is missing or still a placeholder.
    #[error("Form target is not configured")]
    NotConfigured,

    /// The endpoint reported field-level errors.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// No response within the deadline.
    #[error("Request timed out")]
    Timeout,

    /// Failure status without a usable message.
    #[error("HTTP {0}")]
    Http(u16),

    /// Network unreachable or similar.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The submission could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl SubmitError {
    /// Status line shown under the form.
    ///
    /// Validation messages are shown verbatim, joined with `, `.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => messages::FORM_NOT_CONFIGURED.to_string(),
            Self::Validation(errors) => errors.join(", "),
            Self::Timeout => messages::TOO_SLOW.to_string(),
            Self::Http(_) | Self::Transport(_) | Self::Encoding(_) => {
                messages::RETRY_LATER.to_string()
            }
        }
    }
}

impl From<FetchError> for SubmitError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout(_) => Self::Timeout,
            FetchError::Status { status, .. } => Self::Http(status),
            FetchError::Transport(message) | FetchError::InvalidUrl(message) => {
                Self::Transport(message)
            }
        }
    }
}
