//! Order placement and administration handlers.

use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;

use storekeeper_core::{OrderId, OrderStatus, UserId};

use crate::envelope::{Envelope, Pagination};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path, Query};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::routes::page_window;
use crate::services::orders::{OrderService, PlaceOrderRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: OrderId,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct DeleteOrderParams {
    pub id: OrderId,
}

/// `POST /orders` - place an order.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    // Customers may only place orders for themselves.
    if !identity.is_admin() && request.user_id != identity.user_id {
        return Err(AppError::Forbidden(
            "Cannot place an order for another user".to_owned(),
        ));
    }

    let order = OrderService::new(state.pool()).place(&request).await?;

    tracing::info!(order_id = %order.id, user_id = %order.user_id, "order placed");

    Ok(Json(Envelope::ok(order)))
}

/// `GET /orders` - paginated listing with optional filters.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<ListOrdersParams>,
) -> Result<impl IntoResponse> {
    let (page, limit, offset) = page_window(params.page, params.limit);

    let (orders, total) = crate::db::OrderRepository::new(state.pool())
        .list(params.user_id, params.status, limit, offset)
        .await?;

    Ok(Json(Envelope::paginated(
        orders,
        Pagination::new(page, limit, total),
    )))
}

/// `GET /orders/{id}` - enriched order detail, visible to its owner or an admin.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = crate::db::OrderRepository::new(state.pool())
        .get_enriched(id)
        .await?
        .ok_or_else(|| AppError::NotFound("order".to_owned()))?;

    // Hide other users' orders from non-admins rather than confirming they exist.
    if !identity.is_admin() && order.user_id != identity.user_id {
        return Err(AppError::NotFound("order".to_owned()));
    }

    Ok(Json(Envelope::ok(order)))
}

/// `PUT /orders` - update an order's status. Any status may move to any other.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let order = crate::db::OrderRepository::new(state.pool())
        .update_status(request.id, request.status)
        .await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

    Ok(Json(Envelope::ok(order)))
}

/// `DELETE /orders?id=` - hard-delete an order; line items cascade.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<DeleteOrderParams>,
) -> Result<impl IntoResponse> {
    let deleted = crate::db::OrderRepository::new(state.pool())
        .delete(params.id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("order".to_owned()));
    }

    tracing::info!(order_id = %params.id, "order deleted");

    Ok(Json(Envelope::done("order deleted")))
}
