//! Order ledger repository: placement transaction, read-back, administration.
//!
//! Placement is the one multi-table write in the system. The order header,
//! every line item, and every stock decrement land in a single transaction or
//! not at all. The stock decrement is a single conditional `UPDATE` so that
//! two placements racing on the same product are serialized by the row lock
//! and the loser observes the already-decremented quantity.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use storekeeper_core::{Email, Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{EnrichedOrder, EnrichedOrderItem, NewOrder, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, total_amount, status, shipping_address, phone, \
                             payment_method, notes, created_at, updated_at";

/// Errors from the placement transaction.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A line item asked for more units than the product has in stock.
    /// The whole transaction has been rolled back.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: i32,
    },

    /// A line item referenced a product that doesn't exist.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Underlying storage failure; nothing was committed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlacementError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Row shape for the enriched header read-back.
#[derive(sqlx::FromRow)]
struct EnrichedHeaderRow {
    id: OrderId,
    user_id: UserId,
    customer_name: Option<String>,
    customer_email: Option<Email>,
    total_amount: Money,
    status: OrderStatus,
    shipping_address: String,
    phone: String,
    payment_method: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Atomically create an order header, its line items, and the matching
    /// stock decrements.
    ///
    /// Line items are written in input order. Each decrement is the
    /// conditional form `stock_quantity = stock_quantity - n WHERE ... AND
    /// stock_quantity >= n`; a zero-row result means the product is missing
    /// or under-stocked, and the whole transaction rolls back.
    ///
    /// Input is assumed validated (non-empty items, quantities >= 1); this
    /// method only enforces the storage-level invariants.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::InsufficientStock` or
    /// `PlacementError::UnknownProduct` for business-rule failures, and
    /// `PlacementError::Repository` for storage failures. In every error case
    /// no effect of the attempt remains visible.
    pub async fn place(
        &self,
        order_id: OrderId,
        new: &NewOrder,
    ) -> Result<(Order, Vec<OrderItem>), PlacementError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO storekeeper.customer_order
                (id, user_id, total_amount, status, shipping_address, phone, payment_method, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order_id)
        .bind(new.user_id)
        .bind(new.total_amount)
        .bind(OrderStatus::Pending)
        .bind(&new.shipping_address)
        .bind(&new.phone)
        .bind(&new.payment_method)
        .bind(&new.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new.items.len());
        for (position, item) in new.items.iter().enumerate() {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!(
                    "quantity out of range: {}",
                    item.quantity
                ))
            })?;

            let row = sqlx::query_as::<_, OrderItem>(
                r"
                INSERT INTO storekeeper.order_item
                    (id, order_id, product_id, position, quantity, price_per_unit)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, order_id, product_id, position, quantity, price_per_unit
                ",
            )
            .bind(OrderItemId::generate())
            .bind(order.id)
            .bind(item.product_id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .bind(quantity)
            .bind(item.price_per_unit)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return PlacementError::UnknownProduct(item.product_id);
                }
                PlacementError::from(e)
            })?;

            let updated = sqlx::query(
                r"
                UPDATE storekeeper.product
                SET stock_quantity = stock_quantity - $2, updated_at = NOW()
                WHERE id = $1 AND stock_quantity >= $2
                ",
            )
            .bind(item.product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                let available = sqlx::query_scalar::<_, i32>(
                    r"SELECT stock_quantity FROM storekeeper.product WHERE id = $1",
                )
                .bind(item.product_id)
                .fetch_optional(&mut *tx)
                .await?;

                // Dropping tx rolls back the header and earlier items.
                return Err(available.map_or(
                    PlacementError::UnknownProduct(item.product_id),
                    |available| PlacementError::InsufficientStock {
                        product_id: item.product_id,
                        requested: item.quantity,
                        available,
                    },
                ));
            }

            items.push(row);
        }

        tx.commit().await?;

        Ok((order, items))
    }

    /// Get an order joined with customer and product display fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_enriched(
        &self,
        id: OrderId,
    ) -> Result<Option<EnrichedOrder>, RepositoryError> {
        let Some(header) = sqlx::query_as::<_, EnrichedHeaderRow>(
            r"
            SELECT o.id, o.user_id, u.name AS customer_name, u.email AS customer_email,
                   o.total_amount, o.status, o.shipping_address, o.phone,
                   o.payment_method, o.notes, o.created_at, o.updated_at
            FROM storekeeper.customer_order o
            LEFT JOIN storekeeper.user_account u ON u.id = o.user_id
            WHERE o.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, EnrichedOrderItem>(
            r"
            SELECT i.id, i.product_id, p.name AS product_name, i.quantity, i.price_per_unit
            FROM storekeeper.order_item i
            LEFT JOIN storekeeper.product p ON p.id = i.product_id
            WHERE i.order_id = $1
            ORDER BY i.position ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(EnrichedOrder {
            id: header.id,
            user_id: header.user_id,
            customer_name: header.customer_name,
            customer_email: header.customer_email,
            total_amount: header.total_amount,
            status: header.status,
            shipping_address: header.shipping_address,
            phone: header.phone,
            payment_method: header.payment_method,
            notes: header.notes,
            created_at: header.created_at,
            updated_at: header.updated_at,
            items,
        }))
    }

    /// List order headers, newest first, with optional user and status filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        user_id: Option<UserId>,
        status: Option<OrderStatus>,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Order>, u64), RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM storekeeper.customer_order
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(user_id)
        .bind(status)
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM storekeeper.customer_order
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok((orders, u64::try_from(total).unwrap_or(0)))
    }

    /// Update an order's status. Any status may move to any other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE storekeeper.customer_order
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        order.ok_or(RepositoryError::NotFound)
    }

    /// Hard-delete an order. Line items cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(r"DELETE FROM storekeeper.customer_order WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
