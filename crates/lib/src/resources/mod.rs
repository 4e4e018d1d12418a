//! Resource synchronization for the nested profile collections.
//!
//! One `ResourceClient` per collection keeps a local copy of the server's
//! sequence and reconciles it after every mutation by invalidation: a
//! successful create/update/delete marks the cache stale, and the next
//! `list()` refetches wholesale. There is no optimistic splicing: the
//! collections are small and correctness under concurrent edits matters
//! more than perceived latency. The staleness window is bounded by one
//! round trip.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

pub mod errors;
pub mod types;

pub use errors::ResourceError;
pub use types::{
    Education, EducationDraft, EducationPatch, Experience, ExperienceDraft, ExperiencePatch,
    Skill, SkillDraft, SkillLevel, SkillPatch,
};

use crate::{Result, transport::ApiTransport};

/// A profile collection kind with server-assigned integer ids.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular kind name, used in error messages.
    const KIND: &'static str;
    /// Collection path, e.g. `/auth/skills/`.
    const PATH: &'static str;
    /// New-item payload: the item minus id and server-only fields.
    type Draft: Serialize + Send + Sync;
    /// Partial-update payload.
    type Patch: Serialize + Send + Sync;

    /// The server-assigned id.
    fn id(&self) -> i64;
}

/// Client for one resource kind, with invalidate-then-refetch caching.
///
/// Owned by the consuming view and dropped with it; there is no cross-view
/// cache retention. The transport is shared with the session machine so the
/// bearer header is always the machine's current one.
pub struct ResourceClient<R: Resource> {
    transport: Arc<ApiTransport>,
    /// `None` means stale or never fetched; `Some` is trusted until the next
    /// successful mutation. Held across the fetch so concurrent `list()`
    /// callers coalesce into a single remote read.
    cache: Mutex<Option<Vec<R>>>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self {
            transport,
            cache: Mutex::new(None),
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}{id}/", R::PATH)
    }

    /// The ordered collection, from cache when fresh, otherwise refetched.
    ///
    /// A refetch replaces the cached sequence wholesale; there is no
    /// client-side merging.
    pub async fn list(&self) -> Result<Vec<R>> {
        let mut cache = self.cache.lock().await;
        if let Some(items) = cache.as_ref() {
            return Ok(items.clone());
        }

        let items: Vec<R> = self.transport.get_json(R::PATH).await?;
        tracing::debug!(kind = R::KIND, count = items.len(), "Collection fetched");
        *cache = Some(items.clone());
        Ok(items)
    }

    /// Create an item, invalidating the cached sequence on success.
    ///
    /// The created item is returned for immediate display but is never
    /// spliced into the cache.
    pub async fn create(&self, draft: &R::Draft) -> Result<R> {
        let created: R = self.transport.post_json(R::PATH, draft).await?;
        self.invalidate().await;
        Ok(created)
    }

    /// Partially update an item, invalidating the cached sequence on success.
    ///
    /// Fails with `ResourceError::NotFound` when the id does not exist
    /// server-side; not retried.
    pub async fn update(&self, id: i64, patch: &R::Patch) -> Result<R> {
        let updated: R = self
            .transport
            .patch_json(&Self::item_path(id), patch)
            .await
            .map_err(|e| Self::map_not_found(e, id))?;
        self.invalidate().await;
        Ok(updated)
    }

    /// Delete an item, invalidating the cached sequence on success.
    ///
    /// A double-delete surfaces `ResourceError::NotFound`; tolerating it is
    /// the caller's choice.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&Self::item_path(id))
            .await
            .map_err(|e| Self::map_not_found(e, id))?;
        self.invalidate().await;
        Ok(())
    }

    /// Mark the cached sequence stale. The next `list()` refetches.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    fn map_not_found(err: crate::Error, id: i64) -> crate::Error {
        match &err {
            crate::Error::Transport(t_err) if t_err.is_not_found() => {
                ResourceError::NotFound { kind: R::KIND, id }.into()
            }
            _ => err,
        }
    }
}
