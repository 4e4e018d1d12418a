//! Authentication error types for the session system.

use thiserror::Error;

use crate::Error;

/// Errors that can occur while establishing or maintaining a session.
///
/// Transport failures are not represented here; they stay
/// `transport::TransportError` and are retryable by the caller.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AuthError {
    /// The remote rejected the presented credentials.
    ///
    /// `detail` is the remote error payload, surfaced verbatim for display.
    /// The session is unaffected.
    #[error("Login rejected: {detail}")]
    InvalidCredentials {
        /// Human-readable rejection from the server
        detail: String,
    },

    /// The remote accepted the credentials but the principal does not
    /// qualify for the gate. Nothing was persisted.
    #[error("Account '{username}' is authenticated but not authorized for this area")]
    NotAuthorized {
        /// The account that failed the privilege predicate
        username: String,
    },

    /// A previously valid token was rejected on a later call.
    ///
    /// Handled at the session machine boundary by clearing the session;
    /// callers see a return to `Unauthenticated`, not an error dialog.
    #[error("Session expired or token rejected")]
    SessionExpired,
}

impl AuthError {
    /// Check if the remote rejected the credentials themselves.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials { .. })
    }

    /// Check if this is a valid login lacking the required privilege.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AuthError::NotAuthorized { .. })
    }

    /// Check if a previously valid token was rejected.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AuthError::SessionExpired)
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Auth(err)
    }
}
