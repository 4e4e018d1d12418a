//!
//! Mentora: client library for the Mentora opportunity & mentorship platform API.
//! This library provides session management, access gating, and profile
//! collection synchronization against a remote Mentora server.
//!
//! ## Core Concepts
//!
//! * **Credential Store (`creds::CredentialStore`)**: Persists the session token pair
//!   across process restarts. `FileStore` is the durable implementation; `InMemory`
//!   backs tests and throwaway sessions.
//! * **Transport (`transport::ApiTransport`)**: The HTTP client. Owns the base URL and
//!   the default bearer header, and exposes the raw login/profile calls plus generic
//!   JSON verbs used by the resource clients.
//! * **Session Manager (`session::SessionManager`)**: The authentication state machine.
//!   Resolves a stored token into `Authenticated`/`Unauthenticated`, performs login and
//!   logout, and enforces the gate's privilege predicate.
//! * **Access Guard (`session::guard`)**: Pure decision function from session state to
//!   `Granted`/`Denied`/`Pending`, with optional fine-grained permission checks.
//! * **Resource Clients (`resources::ResourceClient`)**: Generic fetch/mutate engine for
//!   the nested profile collections (skills, education, experience) with
//!   invalidate-then-refetch cache semantics.

pub mod creds;
pub mod resources;
pub mod session;
pub mod transport;

/// Re-export the main entry points for easier access.
pub use session::{Gate, SessionManager, SessionState};
pub use transport::ApiTransport;

/// Result type used throughout the Mentora library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Mentora library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured authentication errors from the session module
    #[error(transparent)]
    Auth(session::AuthError),

    /// Structured credential storage errors from the creds module
    #[error(transparent)]
    Creds(creds::CredsError),

    /// Structured HTTP transport errors from the transport module
    #[error(transparent)]
    Transport(transport::TransportError),

    /// Structured resource errors from the resources module
    #[error(transparent)]
    Resource(resources::ResourceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Auth(_) => "session",
            Error::Creds(_) => "creds",
            Error::Transport(_) => "transport",
            Error::Resource(_) => "resources",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Resource(res_err) => res_err.is_not_found(),
            Error::Transport(t_err) => t_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates the remote rejected the presented credentials.
    pub fn is_credential_error(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_credential_error(),
            _ => false,
        }
    }

    /// Check if this error indicates a valid login that lacks the required privilege.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if this error indicates an expired or rejected session token.
    pub fn is_session_expired(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_session_expired(),
            Error::Transport(t_err) => t_err.is_auth_rejection(),
            _ => false,
        }
    }

    /// Check if this error is a generic transport failure the caller may retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(t_err) => t_err.is_retryable(),
            _ => false,
        }
    }

    /// Check if this error is credential-storage related.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Creds(_) | Error::Io(_))
    }
}
