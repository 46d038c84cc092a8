//! Error types for text generation.
//!
//! Every variant is recoverable from the judge panel's point of view:
//! callers fall back to deterministic behavior instead of failing the game.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors a [`TextGenerator`](crate::TextGenerator) can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The provider could not be reached (DNS, connection refused, TLS).
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete in time.
    #[error("generation timed out")]
    Timeout,

    /// The provider rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider is throttling requests.
    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Delay suggested by the provider, if any.
        retry_after: Option<Duration>,
    },

    /// The provider answered, but not with usable text.
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// Any other non-success status reported by the provider.
    #[error("provider returned status {status}: {message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Body or reason phrase.
        message: String,
    },
}

impl GenerationError {
    /// Returns true for failures that a later attempt might not hit.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout | Self::RateLimited { .. } => true,
            Self::Provider { status, .. } => *status >= 500,
            Self::Auth(_) | Self::Malformed(_) => false,
        }
    }
}
