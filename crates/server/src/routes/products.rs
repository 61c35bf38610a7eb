//! Catalog product handlers. Writes are admin-gated.

use axum::{extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use storekeeper_core::{CategoryId, Money, ProductId};

use crate::db::ProductRepository;
use crate::db::products::ProductInput;
use crate::envelope::{Envelope, Pagination};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path, Query};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::routes::page_window;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    #[serde(rename = "categoryId")]
    pub category_id: Option<CategoryId>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Product fields as submitted by the client.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: ProductRequest,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProductParams {
    pub id: ProductId,
}

fn into_input(request: &ProductRequest) -> Result<ProductInput> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_owned()));
    }
    let price = Money::new(request.price)
        .map_err(|_| AppError::BadRequest("price must not be negative".to_owned()))?;
    if request.stock_quantity < 0 {
        return Err(AppError::BadRequest(
            "stock_quantity must not be negative".to_owned(),
        ));
    }

    Ok(ProductInput {
        name: request.name.clone(),
        description: request.description.clone(),
        price,
        stock_quantity: request.stock_quantity,
        image_url: request.image_url.clone(),
        category_id: request.category_id,
    })
}

/// `GET /products` - paginated listing, optionally filtered by category.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Query(params): Query<ListProductsParams>,
) -> Result<impl IntoResponse> {
    let (page, limit, offset) = page_window(params.page, params.limit);

    let (products, total) = ProductRepository::new(state.pool())
        .list(params.category_id, limit, offset)
        .await?;

    Ok(Json(Envelope::paginated(
        products,
        Pagination::new(page, limit, total),
    )))
}

/// `GET /products/{id}` - product detail.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_owned()))?;

    Ok(Json(Envelope::ok(product)))
}

/// `POST /products` - create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(request): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    let input = into_input(&request)?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok(Json(Envelope::ok(product)))
}

/// `PUT /products` - replace all editable fields of a product.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(request): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    let input = into_input(&request.fields)?;
    let product = ProductRepository::new(state.pool())
        .update(request.id, &input)
        .await?;

    Ok(Json(Envelope::ok(product)))
}

/// `DELETE /products?id=` - delete a product.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<DeleteProductParams>,
) -> Result<impl IntoResponse> {
    let deleted = ProductRepository::new(state.pool()).delete(params.id).await?;

    if !deleted {
        return Err(AppError::NotFound("product".to_owned()));
    }

    Ok(Json(Envelope::done("product deleted")))
}
