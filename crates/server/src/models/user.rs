//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeeper_core::{Email, UserId, UserRole};

/// A dashboard user account.
///
/// The password hash is deliberately not part of this type; it is only ever
/// handled inside the user repository and the auth service.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The authenticated identity carried by a verified bearer token.
///
/// This is what route handlers see after the auth extractor has run; it is
/// also the claim set embedded in issued tokens (plus expiry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl Identity {
    /// Whether this identity may perform administrative operations.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
