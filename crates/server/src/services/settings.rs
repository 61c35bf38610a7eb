//! Dashboard settings with a short-lived read cache.
//!
//! Settings are JSON documents keyed by name. Reads go through a TTL cache so
//! hot keys don't hit the database on every request; writes update the store
//! first and then overwrite the cached entry, so a successful write is
//! visible to the next read on this instance. Other instances converge within
//! the TTL.

use moka::future::Cache;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::time::Duration;

use crate::db::RepositoryError;
use crate::db::settings::SettingsRepository;

const CACHE_TTL: Duration = Duration::from_secs(60);
const CACHE_CAPACITY: u64 = 1024;

/// Cached settings store, cheap to clone and share across handlers.
#[derive(Clone)]
pub struct SettingsService {
    pool: PgPool,
    cache: Cache<String, JsonValue>,
}

impl SettingsService {
    /// Create a settings service over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Fetch a setting, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        if let Some(value) = self.cache.get(key).await {
            return Ok(Some(value));
        }

        let value = SettingsRepository::new(&self.pool).get(key).await?;
        if let Some(value) = &value {
            self.cache.insert(key.to_owned(), value.clone()).await;
        }

        Ok(value)
    }

    /// Create or replace a setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails. The cache is
    /// only updated after the write succeeds.
    pub async fn put(&self, key: &str, value: JsonValue) -> Result<(), RepositoryError> {
        SettingsRepository::new(&self.pool).set(key, &value).await?;
        self.cache.insert(key.to_owned(), value).await;

        Ok(())
    }
}
