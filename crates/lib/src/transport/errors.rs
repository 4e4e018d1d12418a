//! Error types for the HTTP transport.

use thiserror::Error;

use crate::Error;

/// Errors that can occur while talking to the remote API.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The configured base URL could not be parsed or joined.
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The request never produced an HTTP response (DNS, connect, timeout).
    ///
    /// Retryable: nothing about the session can be concluded from it.
    #[error("Failed to reach {url}: {reason}")]
    Connection { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Server returned {status} for {url}")]
    Status {
        status: u16,
        url: String,
        /// Raw response body, kept for caller display
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl TransportError {
    /// Check if this is a definitive authentication rejection (401/403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, TransportError::Status { status: 401 | 403, .. })
    }

    /// Check if the server reported the target resource missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }

    /// Check if the caller may simply re-issue the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Connection { .. })
    }

    /// The HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}
