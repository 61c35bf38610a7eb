//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! CLI binary at compile time. The server never runs them on startup.

use super::{CommandError, connect};

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
