//! Site-level errors.

use edha_core::CoreError;
use edha_fetch::{ConfigError, FetchError};
use thiserror::Error;

use crate::messages;

/// Errors raised while loading a page.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The detail page was opened without `?slug=`.
    #[error("Paramètre manquant : ?slug=...")]
    MissingSlug,

    /// A request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A backend record is unusable.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SiteError {
    /// Message shown to visitors.
    ///
    /// Timeouts get the dedicated "server too slow" text; everything else
    /// shows its own message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(e) if e.is_timeout() => messages::TOO_SLOW.to_string(),
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    messages::UNKNOWN_ERROR.to_string()
                } else {
                    message
                }
            }
        }
    }

    /// Returns true if a request hit its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_timeout())
    }
}
