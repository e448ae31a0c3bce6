//! Error types for the Akismet client.
//!
//! # Design
//! The precondition variants are raised before any request is built, so
//! callers can tell a misconfigured client apart from a network failure.
//! `KeyInvalid` is the only error derived from a response body; `check`,
//! `spam` and `ham` never fail on an unexpected body. Transport failures are
//! wrapped as-is in `Transport` and never retried or reclassified.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by `AkismetClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key configured (absent or empty). Always checked first.
    #[error("API key not set")]
    KeyNotSet,

    /// No blog URL configured (absent or empty).
    #[error("blog URL not set")]
    BlogNotSet,

    /// The API key contains characters that cannot appear in a hostname
    /// label, so it cannot address the key's subdomain.
    #[error("API key is not a valid hostname label")]
    KeyMalformed,

    /// `verify-key` answered `invalid`.
    #[error("API key rejected by the service")]
    KeyInvalid,

    /// The transport failed to complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request parameters could not be form-encoded.
    #[error("form encoding failed: {0}")]
    Encoding(#[from] serde_urlencoded::ser::Error),
}

/// Opaque failure raised by a `Transport` implementation.
#[derive(Debug)]
pub struct TransportError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            source: source.into(),
        }
    }

    /// Borrow the underlying error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.source
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.source)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_wraps_message() {
        let err = TransportError::new("connection refused");
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert_eq!(err.inner().to_string(), "connection refused");
    }

    #[test]
    fn transport_error_converts_into_client_error() {
        let err: ClientError = TransportError::new("timed out").into();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.to_string(), "transport error: timed out");
    }

    #[test]
    fn transport_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = TransportError::new(io);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "reset");
    }

    #[test]
    fn precondition_messages() {
        assert_eq!(ClientError::KeyNotSet.to_string(), "API key not set");
        assert_eq!(ClientError::BlogNotSet.to_string(), "blog URL not set");
        assert_eq!(
            ClientError::KeyInvalid.to_string(),
            "API key rejected by the service"
        );
        assert_eq!(
            ClientError::KeyMalformed.to_string(),
            "API key is not a valid hostname label"
        );
    }

    #[test]
    fn encoding_error_keeps_source() {
        // A bare string is not a sequence of pairs.
        let err: ClientError = serde_urlencoded::to_string("loose").unwrap_err().into();
        assert!(matches!(err, ClientError::Encoding(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
