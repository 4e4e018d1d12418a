//! Core data types for the session system.

use serde::{Deserialize, Serialize};

/// Platform role carried by every account.
///
/// Wire form is lowercase (`"admin"`, `"student"`, ...).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Graduate,
    Mentor,
    Admin,
    Institution,
}

/// The authenticated caller's identity and privilege descriptors.
///
/// Reconstructed from the profile endpoint on every cold start and after
/// login; held in memory only. The stored artifact is the token pair, never
/// the principal itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Principal {
    /// Server-assigned account id
    pub id: i64,

    /// Unique login handle
    pub username: String,

    /// Account email address
    pub email: String,

    /// Given name
    #[serde(default)]
    pub first_name: String,

    /// Family name
    #[serde(default)]
    pub last_name: String,

    /// Platform role marker
    pub user_type: Role,

    /// Staff flag, grants the admin gate
    #[serde(default)]
    pub is_staff: bool,

    /// Superuser flag, grants the admin gate and every permission
    #[serde(default)]
    pub is_superuser: bool,

    /// Fine-grained permission names. Absent is equivalent to empty,
    /// never to "all permissions".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Principal {
    /// Check whether this principal qualifies for the admin gate.
    ///
    /// This is the single privilege predicate used by the session machine and
    /// the access guard; it is never re-derived per call site.
    pub fn is_admin(&self) -> bool {
        self.user_type == Role::Admin || self.is_staff || self.is_superuser
    }

    /// Check whether this principal holds a specific permission.
    ///
    /// Superusers and admin-role accounts implicitly hold every permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_superuser || self.user_type == Role::Admin {
            return true;
        }
        self.permissions
            .as_deref()
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }

    /// Human-readable name for display surfaces.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// Login request body for `POST /auth/login/`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration request body for `POST /auth/register/`.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
    pub user_type: Role,
}

/// Successful login/register response: the issued token pair plus the
/// already-classified principal.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginSuccess {
    pub access: String,
    pub refresh: String,
    pub user: Principal,
}

/// Partial profile update for `PATCH /auth/profile/`.
///
/// Only set fields are serialized; the server merges into the stored profile.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
