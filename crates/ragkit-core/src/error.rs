//! Error taxonomy shared by every ragkit component.
//!
//! Provider failures and validation failures are separate variants because
//! only validation failures are retried (inside
//! [`structured_json`](crate::structured::structured_json)). Everything else
//! is returned to the immediate caller unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing credential or invalid setting.
    #[error("{0}")]
    Config(String),

    /// The provider answered with a non-success HTTP status.
    #[error("request failed with status {status}: {body}")]
    Provider { status: u16, body: String },

    /// The request could not be sent or completed (connect failure, timeout).
    #[error("send request: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provider answered successfully but the payload was unusable.
    #[error("unexpected response from provider: {0}")]
    UnexpectedResponse(String),

    /// Structured output still failed validation after the last attempt.
    #[error("structured output validation failed: {0}")]
    Validation(#[source] ValidationError),

    #[error("store file {}: {source}", .path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode store {}: {source}", .path.display())]
    StoreDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("encode store: {0}")]
    StoreEncode(#[source] serde_json::Error),
}

impl Error {
    /// True for the provider-side failures that are never retried.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Error::Provider { .. } | Error::Transport(_) | Error::UnexpectedResponse(_)
        )
    }
}

/// Why a single structured-output candidate was rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Parse failure, unknown field, missing field, or trailing content.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// A required field was present but blank after trimming.
    #[error("missing required field: {0}")]
    EmptyField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_carries_status_and_body() {
        let err = Error::Provider {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "request failed with status 429: rate limited");
        assert!(err.is_provider_failure());
    }

    #[test]
    fn test_validation_is_not_provider_failure() {
        let err = Error::Validation(ValidationError::EmptyField("title"));
        assert!(!err.is_provider_failure());
        assert!(err.to_string().contains("missing required field: title"));
    }
}
