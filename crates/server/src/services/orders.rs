//! Order placement service.
//!
//! Accepts a proposed order, validates it without touching storage, runs the
//! placement transaction, and returns the enriched representation. The
//! read-back join after commit is best-effort: if it fails, the committed
//! order is returned in degraded form rather than failing the request.
//!
//! There is no idempotency key and no automatic retry: a client that
//! resubmits after a transport failure may create a duplicate order.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use storekeeper_core::{Money, OrderId, ProductId, UserId};

use crate::db::orders::{OrderRepository, PlacementError};
use crate::db::RepositoryError;
use crate::envelope::FieldError;
use crate::models::{EnrichedOrder, NewOrder, NewOrderItem};

/// Wire shape for `POST /orders`.
///
/// Raw numeric types on purpose: validation turns them into the checked
/// domain types and reports every offending field at once, instead of
/// rejecting at deserialization with an opaque error.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub phone: String,
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<PlaceOrderItem>,
}

/// One proposed line item, unvalidated.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price_per_unit: Decimal,
}

/// Errors from the order placement service.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The proposed order is malformed. Storage was not touched.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// The placement transaction failed and was rolled back.
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// A non-transactional storage operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order placement and administration service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order: validate, run the transaction, read back enrichment.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` before any storage call for malformed
    /// input, and `OrderError::Placement` when the transaction rolled back
    /// (insufficient stock, unknown product, storage failure).
    pub async fn place(&self, request: &PlaceOrderRequest) -> Result<EnrichedOrder, OrderError> {
        let new = validate(request).map_err(OrderError::Validation)?;

        let (order, items) = self.orders.place(OrderId::generate(), &new).await?;

        // Enrichment is not part of the atomicity contract: the order is
        // committed at this point, so a read-back failure only degrades the
        // payload.
        match self.orders.get_enriched(order.id).await {
            Ok(Some(enriched)) => Ok(enriched),
            Ok(None) => {
                tracing::warn!(order_id = %order.id, "read-back found no order after commit");
                Ok(EnrichedOrder::degraded(order, &items))
            }
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "order read-back failed");
                Ok(EnrichedOrder::degraded(order, &items))
            }
        }
    }
}

/// Validate a proposed order and convert it into checked domain types.
///
/// # Errors
///
/// Returns one [`FieldError`] per offending field; an empty result means the
/// input is well-formed.
pub fn validate(request: &PlaceOrderRequest) -> Result<NewOrder, Vec<FieldError>> {
    let mut errors = Vec::new();

    let total_amount = Money::new(request.total_amount)
        .map_err(|_| errors.push(FieldError::new("total_amount", "must not be negative")))
        .ok();

    if request.shipping_address.trim().is_empty() {
        errors.push(FieldError::new("shipping_address", "must not be empty"));
    }
    if request.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "must not be empty"));
    }
    if request.payment_method.trim().is_empty() {
        errors.push(FieldError::new("payment_method", "must not be empty"));
    }

    if request.items.is_empty() {
        errors.push(FieldError::new("items", "at least one item is required"));
    }

    let mut items = Vec::with_capacity(request.items.len());
    for (i, item) in request.items.iter().enumerate() {
        let quantity = match u32::try_from(item.quantity) {
            Ok(q) if q >= 1 => Some(q),
            _ => {
                errors.push(FieldError::new(
                    format!("items[{i}].quantity"),
                    "must be a positive integer",
                ));
                None
            }
        };

        let price_per_unit = Money::new(item.price_per_unit)
            .map_err(|_| {
                errors.push(FieldError::new(
                    format!("items[{i}].price_per_unit"),
                    "must not be negative",
                ));
            })
            .ok();

        if let (Some(quantity), Some(price_per_unit)) = (quantity, price_per_unit) {
            items.push(NewOrderItem {
                product_id: item.product_id,
                quantity,
                price_per_unit,
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // total_amount is Some by construction when errors is empty
    Ok(NewOrder {
        user_id: request.user_id,
        total_amount: total_amount.unwrap_or(Money::ZERO),
        shipping_address: request.shipping_address.clone(),
        phone: request.phone.clone(),
        payment_method: request.payment_method.clone(),
        notes: request.notes.clone(),
        items,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use uuid::Uuid;

    fn valid_request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            user_id: UserId::new(Uuid::new_v4()),
            total_amount: dec!(200),
            shipping_address: "1 Main St".to_owned(),
            phone: "+1 555 0100".to_owned(),
            payment_method: "card".to_owned(),
            notes: None,
            items: vec![PlaceOrderItem {
                product_id: ProductId::generate(),
                quantity: 2,
                price_per_unit: dec!(100),
            }],
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let new = validate(&valid_request()).unwrap();
        assert_eq!(new.items.len(), 1);
        assert_eq!(new.items.first().unwrap().quantity, 2);
        assert_eq!(new.total_amount.amount(), dec!(200));
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut request = valid_request();
        request.items.clear();

        let errors = validate(&request).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "items"));
    }

    #[test]
    fn test_blank_required_fields_rejected() {
        let mut request = valid_request();
        request.shipping_address = "  ".to_owned();
        request.phone = String::new();
        request.payment_method = String::new();

        let errors = validate(&request).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"shipping_address"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"payment_method"));
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        for bad in [0, -3] {
            let mut request = valid_request();
            request.items.first_mut().unwrap().quantity = bad;

            let errors = validate(&request).unwrap_err();
            assert!(errors.iter().any(|e| e.field == "items[0].quantity"));
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut request = valid_request();
        request.items.first_mut().unwrap().price_per_unit = dec!(-1);

        let errors = validate(&request).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "items[0].price_per_unit"));
    }

    #[test]
    fn test_negative_total_rejected() {
        let mut request = valid_request();
        request.total_amount = dec!(-200);

        let errors = validate(&request).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "total_amount"));
    }

    #[test]
    fn test_all_errors_reported_at_once() {
        let request = PlaceOrderRequest {
            user_id: UserId::generate(),
            total_amount: dec!(-1),
            shipping_address: String::new(),
            phone: String::new(),
            payment_method: String::new(),
            notes: None,
            items: vec![],
        };

        let errors = validate(&request).unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
