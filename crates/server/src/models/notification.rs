//! Notification domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeeper_core::{NotificationId, UserId};

/// A dashboard notification.
///
/// `user_id` is `None` for broadcast notifications visible to every account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: Option<UserId>,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
