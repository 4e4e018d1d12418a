//! Error types for credential storage.

use thiserror::Error;

use crate::Error;

/// Errors that can occur while persisting or loading the token pair.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CredsError {
    /// Reading or writing the backing storage failed.
    #[error("Credential storage I/O failed at {path}: {source}")]
    StorageIo {
        /// Path of the backing file
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored contents could not be decoded as a token pair.
    #[error("Stored credentials are corrupt: {reason}")]
    CorruptStore {
        /// Description of the decode failure
        reason: String,
    },
}

impl CredsError {
    /// Check if this error originated in the filesystem.
    pub fn is_io_error(&self) -> bool {
        matches!(self, CredsError::StorageIo { .. })
    }

    /// Check if the stored data was unreadable rather than inaccessible.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CredsError::CorruptStore { .. })
    }
}

impl From<CredsError> for Error {
    fn from(err: CredsError) -> Self {
        Error::Creds(err)
    }
}
