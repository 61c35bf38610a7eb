//! Database-backed tests for storekeeper-server.
//!
//! The tests in `tests/` run the placement transaction against a real
//! PostgreSQL instance via `#[sqlx::test]`. They are `#[ignore]`d by default
//! so the workspace tests pass without a database; run them with:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/storekeeper_test \
//!     cargo test -p storekeeper-integration-tests -- --ignored
//! ```
