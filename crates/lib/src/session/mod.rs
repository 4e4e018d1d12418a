//! Session system for the Mentora client.
//!
//! Owns the authentication/authorization lifecycle: resolving a stored token
//! pair into a classified principal, login/logout, and privilege evaluation
//! against a gate. The manager is explicitly constructed and injected; there
//! is no ambient singleton, so tests instantiate isolated machines freely.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

pub mod errors;
pub mod guard;
pub mod types;

pub use errors::AuthError;
pub use guard::{Access, DeniedReason, can_enter};
pub use types::{Credentials, LoginSuccess, Principal, ProfilePatch, RegisterRequest, Role};

use crate::{
    Result,
    creds::{CredentialStore, TokenPair, token_expired},
    transport::ApiTransport,
};

/// Authentication state of one session machine.
///
/// Exactly one state is active at a time, and every input leads to a defined
/// next state. `Resolving` is the initial state and also where an ambiguous
/// transport failure parks the machine (the guard renders it as pending).
#[derive(Clone, Debug)]
pub enum SessionState {
    /// A session check is in flight or pending retry.
    Resolving,
    /// A principal passed the gate's privilege predicate.
    Authenticated(Principal),
    /// No session, or the last one was cleared.
    Unauthenticated,
}

impl SessionState {
    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, SessionState::Unauthenticated)
    }

    /// The authenticated principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}

/// The privilege predicate a principal must satisfy to hold a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Any valid principal qualifies.
    General,
    /// Admin console: requires the admin role, the staff flag, or the
    /// superuser flag.
    Admin,
}

impl Gate {
    /// Evaluate the predicate for a principal.
    pub fn admits(&self, principal: &Principal) -> bool {
        match self {
            Gate::General => true,
            Gate::Admin => principal.is_admin(),
        }
    }
}

/// The session state machine.
///
/// Single writer of the token pair, the transport's bearer header, and the
/// session state. `initialize`, `login`, `logout`, and `refresh_principal`
/// are serialized behind one in-flight guard so a fast `logout` can never be
/// overwritten by a slow, already in-flight `login` response. Readers take
/// snapshots via [`SessionManager::state`] and must re-derive after any
/// suspension point rather than caching their own copy.
pub struct SessionManager {
    transport: Arc<ApiTransport>,
    store: Arc<dyn CredentialStore>,
    gate: Gate,
    state: RwLock<SessionState>,
    /// Serializes the session operations; one authoritative state at a time.
    op_lock: Mutex<()>,
}

impl SessionManager {
    /// Create a machine in the `Resolving` state.
    ///
    /// Call [`SessionManager::initialize`] once at construction time to
    /// resolve any stored session.
    pub fn new(transport: Arc<ApiTransport>, store: Arc<dyn CredentialStore>, gate: Gate) -> Self {
        Self {
            transport,
            store,
            gate,
            state: RwLock::new(SessionState::Resolving),
            op_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// The authenticated principal, if any.
    pub async fn principal(&self) -> Option<Principal> {
        self.state.read().await.principal().cloned()
    }

    /// Guard decision for a protected view, from the current state.
    pub async fn can_enter(&self, required_permission: Option<&str>) -> Access {
        can_enter(&*self.state.read().await, required_permission)
    }

    /// The gate this machine enforces.
    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// The transport this machine configures. Resource clients share it so
    /// they pick up the bearer header the machine maintains.
    pub fn transport(&self) -> &Arc<ApiTransport> {
        &self.transport
    }

    /// Resolve a stored token pair into a session.
    ///
    /// Expired or rejected tokens are an expected condition, not a caller
    /// error: those paths clear the session, log, and return `Ok`. An
    /// ambiguous transport failure (the server was unreachable) leaves the
    /// machine in `Resolving` with the stored pair intact so a retry can
    /// succeed; it also returns `Ok`, and the state reports what happened.
    pub async fn initialize(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;
        self.set_state(SessionState::Resolving).await;

        let pair = match self.store.load().await {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                self.set_state(SessionState::Unauthenticated).await;
                return Ok(());
            }
            Err(e) => {
                // Unreadable store is equivalent to no session; drop it.
                tracing::warn!(error = %e, "Stored credentials unreadable, clearing");
                let _ = self.store.clear().await;
                self.set_state(SessionState::Unauthenticated).await;
                return Ok(());
            }
        };

        let pair = match self.refresh_if_stale(pair).await {
            RefreshOutcome::Usable(pair) => pair,
            RefreshOutcome::Rejected => {
                self.clear_session().await;
                return Ok(());
            }
            RefreshOutcome::Unreachable => {
                // Stay Resolving; the pair may still be good once the
                // network recovers.
                return Ok(());
            }
        };

        self.transport.set_authorization(Some(&pair.access));
        match self.transport.fetch_principal().await {
            Ok(principal) if self.gate.admits(&principal) => {
                tracing::debug!(username = %principal.username, "Session restored");
                self.set_state(SessionState::Authenticated(principal)).await;
            }
            Ok(principal) => {
                tracing::warn!(
                    username = %principal.username,
                    "Stored session lacks privilege for this gate, clearing"
                );
                self.clear_session().await;
            }
            Err(e) if e.is_session_expired() => {
                tracing::debug!("Stored token rejected, clearing session");
                self.clear_session().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session check unreachable, staying pending");
                self.set_state(SessionState::Resolving).await;
            }
        }
        Ok(())
    }

    /// Exchange credentials for a session.
    ///
    /// On success the pair is persisted, the transport header configured, and
    /// the principal returned. A principal that fails the gate yields
    /// `AuthError::NotAuthorized` with nothing persisted, distinct from the
    /// `AuthError::InvalidCredentials` a remote rejection yields. A login
    /// over an existing session fully replaces it.
    pub async fn login(&self, credentials: &Credentials) -> Result<Principal> {
        let _op = self.op_lock.lock().await;
        self.set_state(SessionState::Resolving).await;

        let success = match self.transport.login(credentials).await {
            Ok(success) => success,
            Err(e) => {
                // Unauthenticated means no bearer header, even one left over
                // from a previous session. The store stays as found.
                self.transport.set_authorization(None);
                self.set_state(SessionState::Unauthenticated).await;
                return Err(e);
            }
        };

        if !self.gate.admits(&success.user) {
            tracing::warn!(
                username = %success.user.username,
                gate = ?self.gate,
                "Login succeeded but principal fails the gate"
            );
            self.transport.set_authorization(None);
            self.set_state(SessionState::Unauthenticated).await;
            return Err(AuthError::NotAuthorized {
                username: success.user.username,
            }
            .into());
        }

        let pair = TokenPair::new(success.access.as_str(), success.refresh.as_str());
        if let Err(e) = self.store.save(&pair).await {
            self.transport.set_authorization(None);
            self.set_state(SessionState::Unauthenticated).await;
            return Err(e);
        }

        self.transport.set_authorization(Some(&pair.access));
        self.set_state(SessionState::Authenticated(success.user.clone()))
            .await;
        tracing::debug!(username = %success.user.username, "Login succeeded");
        Ok(success.user)
    }

    /// End the session: clear stored tokens and the transport header.
    ///
    /// Works from any state, including `Resolving`; a second call is a no-op.
    /// The server-side revocation of the refresh token is best-effort and
    /// never surfaced.
    pub async fn logout(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;

        if let Ok(Some(pair)) = self.store.load().await {
            if let Err(e) = self.transport.revoke(&pair.refresh).await {
                tracing::debug!(error = %e, "Token revocation failed, continuing logout");
            }
        }

        self.store.clear().await?;
        self.transport.set_authorization(None);
        self.set_state(SessionState::Unauthenticated).await;
        Ok(())
    }

    /// Re-fetch and re-classify the principal without touching stored tokens.
    ///
    /// Privilege failure or a definitive token rejection behaves like an
    /// implicit logout. An ambiguous transport failure leaves the current
    /// state untouched and returns the error: a network blip must not
    /// destroy a working session.
    pub async fn refresh_principal(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;

        match self.transport.fetch_principal().await {
            Ok(principal) if self.gate.admits(&principal) => {
                self.set_state(SessionState::Authenticated(principal)).await;
                Ok(())
            }
            Ok(principal) => {
                tracing::warn!(
                    username = %principal.username,
                    "Refreshed principal fails the gate, logging out"
                );
                self.clear_session().await;
                Ok(())
            }
            Err(e) if e.is_session_expired() => {
                tracing::debug!("Token rejected on refresh, logging out");
                self.clear_session().await;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Partially update the profile, refreshing the in-memory principal.
    ///
    /// A definitive token rejection clears the session before surfacing.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Principal> {
        let _op = self.op_lock.lock().await;

        match self.transport.update_profile(patch).await {
            Ok(principal) => {
                if self.state.read().await.is_authenticated() {
                    self.set_state(SessionState::Authenticated(principal.clone()))
                        .await;
                }
                Ok(principal)
            }
            Err(e) if e.is_session_expired() => {
                self.clear_session().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Full clear: stored pair, transport header, and state.
    async fn clear_session(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to clear credential store");
        }
        self.transport.set_authorization(None);
        self.set_state(SessionState::Unauthenticated).await;
    }

    /// Trade an expired access token for a fresh one before the profile
    /// check, when the refresh token still looks valid.
    async fn refresh_if_stale(&self, pair: TokenPair) -> RefreshOutcome {
        if !token_expired(&pair.access) || token_expired(&pair.refresh) {
            return RefreshOutcome::Usable(pair);
        }

        match self.transport.refresh_access(&pair.refresh).await {
            Ok(access) => {
                let refreshed = TokenPair::new(access, pair.refresh.as_str());
                if let Err(e) = self.store.save(&refreshed).await {
                    tracing::warn!(error = %e, "Failed to persist refreshed token");
                }
                RefreshOutcome::Usable(refreshed)
            }
            Err(e) if e.is_session_expired() => {
                tracing::debug!("Refresh token rejected");
                RefreshOutcome::Rejected
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh unreachable");
                RefreshOutcome::Unreachable
            }
        }
    }
}

enum RefreshOutcome {
    Usable(TokenPair),
    Rejected,
    Unreachable,
}
