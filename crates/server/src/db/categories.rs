//! Category repository.

use sqlx::PgPool;

use storekeeper_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO storekeeper.category (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            ",
        )
        .bind(name)
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("category name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(category)
    }

    /// List all categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, description, created_at
            FROM storekeeper.category
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Delete a category by ID.
    ///
    /// Products referencing it fall back to no category (`ON DELETE SET NULL`).
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(r"DELETE FROM storekeeper.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
