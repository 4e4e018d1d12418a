//! Credential storage for the session token pair.
//!
//! The token pair is opaque to this module: no shape validation is performed,
//! only persistence under stable keys. Durable storage survives process
//! restarts but is never shared across isolated profiles.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod file;
pub mod in_memory;

pub use errors::CredsError;
pub use file::FileStore;
pub use in_memory::InMemory;

use crate::Result;

/// The access/refresh credential issued by the remote on login.
///
/// Both values are opaque strings. Serialized under the fixed keys
/// `access_token` / `refresh_token`; absence of either means "no session".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer token attached to authenticated calls
    #[serde(rename = "access_token")]
    pub access: String,

    /// Token used to obtain a fresh access token
    #[serde(rename = "refresh_token")]
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Persistence contract for the session token pair.
///
/// Implementations are opaque pass-throughs: `save` overwrites, `load`
/// returns the last saved pair or `None`, `clear` removes both values and is
/// not an error when nothing is stored.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist the pair, replacing any previously stored one.
    async fn save(&self, pair: &TokenPair) -> Result<()>;

    /// Return the last saved pair, or `None` if absent or cleared.
    async fn load(&self) -> Result<Option<TokenPair>>;

    /// Remove any stored pair. Idempotent.
    async fn clear(&self) -> Result<()>;
}

/// Check whether a JWT's `exp` claim is in the past.
///
/// Only the payload is inspected; no signature verification is attempted.
/// Malformed tokens and tokens without an `exp` claim are treated as expired,
/// which matches how the server will treat them.
pub fn token_expired(token: &str) -> bool {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next()) {
        (Some(_header), Some(payload)) => payload,
        _ => return true,
    };

    let Ok(decoded) = Base64UrlUnpadded::decode_vec(payload) else {
        return true;
    };
    let Ok(claims) = serde_json::from_slice::<serde_json::Value>(&decoded) else {
        return true;
    };

    match claims.get("exp").and_then(|v| v.as_i64()) {
        Some(exp) => exp < chrono::Utc::now().timestamp(),
        None => true,
    }
}
