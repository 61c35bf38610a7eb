//! Settings repository: key/value JSONB storage.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::RepositoryError;

/// Repository for settings database operations.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a setting value by key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>(
            r"SELECT value FROM storekeeper.setting WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(value)
    }

    /// Set a setting value, inserting or replacing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storekeeper.setting (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
