//! Order ledger domain types.
//!
//! An [`Order`] is the header record; [`OrderItem`]s are exclusively owned
//! line items, created atomically with the header and never mutated
//! afterwards. The enriched variants carry joined display fields for response
//! payloads only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeeper_core::{Email, Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order header.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Owning user. Deleting a user does not cascade to their orders.
    pub user_id: UserId,
    /// Total as submitted by the client. The server stores this verbatim and
    /// does not recompute it from line items.
    pub total_amount: Money,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub phone: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item belonging to exactly one order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Zero-based input position, preserved for read-back ordering.
    pub position: i32,
    pub quantity: i32,
    /// Price captured at order time; immutable thereafter.
    pub price_per_unit: Money,
}

/// A proposed order, as submitted to `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Money,
    pub shipping_address: String,
    pub phone: String,
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// One proposed line item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_per_unit: Money,
}

/// An order joined with customer display fields and its line items.
///
/// Produced by the post-commit read-back; the customer fields are `None` when
/// enrichment was degraded (read-back failure after a successful commit).
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: Option<String>,
    pub customer_email: Option<Email>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub phone: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<EnrichedOrderItem>,
}

/// A line item joined with the product's display name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EnrichedOrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price_per_unit: Money,
}

impl EnrichedOrder {
    /// Build a degraded representation from the bare header and submitted
    /// items, for when the read-back join fails after commit.
    #[must_use]
    pub fn degraded(order: Order, items: &[OrderItem]) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            customer_name: None,
            customer_email: None,
            total_amount: order.total_amount,
            status: order.status,
            shipping_address: order.shipping_address,
            phone: order.phone,
            payment_method: order.payment_method,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items: items
                .iter()
                .map(|item| EnrichedOrderItem {
                    id: item.id,
                    product_id: item.product_id,
                    product_name: None,
                    quantity: item.quantity,
                    price_per_unit: item.price_per_unit,
                })
                .collect(),
        }
    }
}
