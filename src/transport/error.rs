//! Error types for the request path.

use super::cancel::CancelReason;
use thiserror::Error;

/// Errors surfaced by transports, the retry policy and the client.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, TLS, timeout, body read).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A transport-level failure reported by a non-reqwest transport.
    #[error("connection error: {message}")]
    Connection {
        /// What went wrong.
        message: String,
    },

    /// The request could not be built (bad URL, bad header, bad proxy).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// The upstream answered with a non-success status.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Every attempt failed at the transport level.
    #[error("request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts made, the first one included.
        attempts: u32,
        /// Error of the final attempt.
        #[source]
        source: Box<TransportError>,
    },

    /// A wait or an in-flight request was aborted by the caller's token.
    #[error("{0}")]
    Cancelled(#[from] CancelReason),
}

impl TransportError {
    /// Creates a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
        }
    }

    /// Creates an invalid-request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: msg.into(),
        }
    }

    /// Returns true if the request was aborted by cancellation or deadline,
    /// as opposed to failing on its own.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled(_))
    }
}
