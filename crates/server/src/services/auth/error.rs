//! Authentication error types.

use thiserror::Error;

use storekeeper_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email/password combination is wrong. Deliberately does not say
    /// which part.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No bearer token or token cookie was presented.
    #[error("missing credentials")]
    MissingCredentials,

    /// The token signature or structure is invalid.
    #[error("invalid token")]
    InvalidToken,

    /// The token signature is valid but the token has expired.
    #[error("expired token")]
    ExpiredToken,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
