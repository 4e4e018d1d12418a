//! Durable file-backed credential store.

use std::path::{Path, PathBuf};

use super::{CredentialStore, CredsError, TokenPair};
use crate::Result;

/// Stores the token pair as a small JSON file.
///
/// The file holds a single object with the `access_token` / `refresh_token`
/// keys. A missing file means "no session"; `clear` removes the file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given file path.
    ///
    /// The file (and its parent directory) is created lazily on first `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CredsError {
        CredsError::StorageIo {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileStore {
    async fn save(&self, pair: &TokenPair) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_vec_pretty(pair)?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenPair>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e).into()),
        };

        let pair = serde_json::from_slice(&contents).map_err(|e| CredsError::CorruptStore {
            reason: e.to_string(),
        })?;
        Ok(Some(pair))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e).into()),
        }
    }
}
