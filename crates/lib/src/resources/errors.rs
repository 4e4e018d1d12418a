//! Error types for the resource synchronization engine.

use thiserror::Error;

use crate::Error;

/// Errors specific to collection mutations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The mutation targeted an id the server does not know.
    ///
    /// Surfaced to the caller, never retried. A double-delete lands here.
    #[error("No {kind} with id {id}")]
    NotFound {
        /// Resource kind name, e.g. "skill"
        kind: &'static str,
        /// The server-assigned id the mutation targeted
        id: i64,
    },
}

impl ResourceError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }
}

impl From<ResourceError> for Error {
    fn from(err: ResourceError) -> Self {
        Error::Resource(err)
    }
}
