//! Admin user management command.
//!
//! Registration over HTTP only ever creates customers; admin accounts are
//! created here, with direct database access.

use storekeeper_core::{Email, UserRole};

use storekeeper_server::db::{RepositoryError, UserRepository};
use storekeeper_server::services::auth::hash_password;

use super::{CommandError, connect};

/// Create a new admin user.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for a malformed email, weak password, or
/// duplicate account, and `CommandError::Database` for storage failures.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email =
        Email::parse(email).map_err(|e| CommandError::Invalid(format!("invalid email: {e}")))?;

    if password.len() < 8 {
        return Err(CommandError::Invalid(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash = hash_password(password)
        .map_err(|e| CommandError::Invalid(format!("password hashing failed: {e}")))?;

    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", email);

    let user = UserRepository::new(&pool)
        .create(&email, &password_hash, name, UserRole::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                CommandError::Invalid(format!("user already exists with email: {email}"))
            }
            RepositoryError::Database(e) => CommandError::Database(e),
            other => CommandError::Invalid(other.to_string()),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(())
}
