//! Notification repository.

use sqlx::PgPool;

use storekeeper_core::{NotificationId, UserId};

use super::RepositoryError;
use crate::models::Notification;

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification. `user_id = None` creates a broadcast.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: Option<UserId>,
        title: &str,
        body: &str,
    ) -> Result<Notification, RepositoryError> {
        let notification = sqlx::query_as::<_, Notification>(
            r"
            INSERT INTO storekeeper.notification (user_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, body, read, created_at
            ",
        )
        .bind(user_id)
        .bind(title)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        Ok(notification)
    }

    /// List notifications visible to a user (their own plus broadcasts),
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r"
            SELECT id, user_id, title, body, read, created_at
            FROM storekeeper.notification
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(notifications)
    }

    /// Mark a notification as read.
    ///
    /// Only the addressed user may mark their own notifications.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no matching notification exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storekeeper.notification
            SET read = TRUE
            WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)
            ",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
