//! In-memory credential store.
//!
//! Backs tests and sessions that should never touch disk.

use std::sync::Mutex;

use super::{CredentialStore, TokenPair};
use crate::Result;

/// Credential store that holds the pair in process memory only.
#[derive(Default)]
pub struct InMemory {
    pair: Mutex<Option<TokenPair>>,
}

impl InMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a pair, as if a previous run saved it.
    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: Mutex::new(Some(pair)),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemory {
    async fn save(&self, pair: &TokenPair) -> Result<()> {
        *self.pair.lock().expect("creds lock poisoned") = Some(pair.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenPair>> {
        Ok(self.pair.lock().expect("creds lock poisoned").clone())
    }

    async fn clear(&self) -> Result<()> {
        *self.pair.lock().expect("creds lock poisoned") = None;
        Ok(())
    }
}
