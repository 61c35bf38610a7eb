//! Product repository for catalog database operations.

use sqlx::PgPool;

use storekeeper_core::{CategoryId, Money, ProductId};

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock_quantity, image_url, category_id, created_at, updated_at";

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO storekeeper.product
                (name, description, price, stock_quantity, image_url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock_quantity)
        .bind(&input.image_url)
        .bind(input.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"SELECT {PRODUCT_COLUMNS} FROM storekeeper.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List products, newest first, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        category_id: Option<CategoryId>,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM storekeeper.product
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(category_id)
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM storekeeper.product
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ",
        )
        .bind(category_id)
        .fetch_one(self.pool)
        .await?;

        Ok((products, u64::try_from(total).unwrap_or(0)))
    }

    /// Update a product, replacing all editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE storekeeper.product
            SET name = $2, description = $3, price = $4, stock_quantity = $5,
                image_url = $6, category_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock_quantity)
        .bind(&input.image_url)
        .bind(input.category_id)
        .fetch_optional(self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(r"DELETE FROM storekeeper.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
