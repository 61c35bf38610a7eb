//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storekeeper_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::User;

/// Row shape for queries that also need the stored password hash.
///
/// Never leaves this module; the hash is handed to the auth service as a
/// plain string alongside the public `User`.
#[derive(sqlx::FromRow)]
struct UserAuthRow {
    id: UserId,
    email: Email,
    name: String,
    role: UserRole,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserAuthRow {
    fn split(self) -> (User, String) {
        (
            User {
                id: self.id,
                email: self.email,
                name: self.name,
                role: self.role,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.password_hash,
        )
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, name, role, created_at, updated_at
            FROM storekeeper.user_account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO storekeeper.user_account (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, created_at, updated_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserAuthRow>(
            r"
            SELECT id, email, name, role, password_hash, created_at, updated_at
            FROM storekeeper.user_account
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserAuthRow::split))
    }

    /// List users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, limit: u32, offset: u64) -> Result<(Vec<User>, u64), RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r"
            SELECT id, email, name, role, created_at, updated_at
            FROM storekeeper.user_account
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM storekeeper.user_account",
        )
        .fetch_one(self.pool)
        .await?;

        Ok((users, u64::try_from(total).unwrap_or(0)))
    }

    /// Delete a user by ID.
    ///
    /// Orders placed by the user are intentionally left in place.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(r"DELETE FROM storekeeper.user_account WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
