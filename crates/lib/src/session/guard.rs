//! Access guard: pure decision from session state to a render outcome.
//!
//! The guard never performs I/O. Callers hold a `SessionState` snapshot and
//! ask whether a protected view may render; the three outcomes map to three
//! distinct surfaces (loading placeholder, login redirect, access denied).

use super::SessionState;

/// The guard's verdict for a protected view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Session resolution is still in flight; render a pending placeholder,
    /// never a decision.
    Pending,
    /// The caller may enter.
    Granted,
    /// The caller may not enter, for the given reason.
    Denied(DeniedReason),
}

/// Why entry was denied. The two reasons demand different UI: a login
/// redirect that preserves the requested destination, versus an explicit
/// access-denied outcome for a caller who is already signed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeniedReason {
    /// No authenticated session; redirect to the login surface.
    NotAuthenticated,
    /// Authenticated but missing the required permission.
    MissingPermission,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Access::Pending)
    }
}

/// Decide whether the current session may enter a protected view.
///
/// With no `required_permission`, any authenticated principal is admitted.
/// With one, superusers and admin-role principals are implicitly admitted;
/// everyone else needs the permission in their explicit set. An absent
/// permission set is an empty set.
pub fn can_enter(state: &SessionState, required_permission: Option<&str>) -> Access {
    match state {
        SessionState::Resolving => Access::Pending,
        SessionState::Unauthenticated => Access::Denied(DeniedReason::NotAuthenticated),
        SessionState::Authenticated(principal) => match required_permission {
            None => Access::Granted,
            Some(permission) if principal.has_permission(permission) => Access::Granted,
            Some(_) => Access::Denied(DeniedReason::MissingPermission),
        },
    }
}
