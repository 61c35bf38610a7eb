//! Category domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeeper_core::CategoryId;

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
