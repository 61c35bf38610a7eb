//! Database operations for the Storekeeper `PostgreSQL` database.
//!
//! # Tables (schema `storekeeper`)
//!
//! - `user_account` - Credential store (email, Argon2 hash, role)
//! - `category` - Product categories
//! - `product` - Catalog store (price, stock)
//! - `customer_order` / `order_item` - Order ledger
//! - `notification` - Dashboard notifications
//! - `setting` - Key/value JSONB settings
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storekeeper-cli -- migrate
//! ```
//! They are never run automatically on server startup.

pub mod categories;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use notifications::NotificationRepository;
pub use orders::{OrderRepository, PlacementError};
pub use products::ProductRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
