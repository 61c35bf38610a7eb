//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeeper_core::{CategoryId, Money, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Current unit price. Line items capture their own price at order time
    /// and do not track changes to this field.
    pub price: Money,
    /// Units in stock. Never negative; decremented atomically by order
    /// placement.
    pub stock_quantity: i32,
    /// Optional image reference.
    pub image_url: Option<String>,
    /// Optional owning category.
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
