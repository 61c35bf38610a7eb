//! Category handlers. Writes are admin-gated.

use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;

use storekeeper_core::CategoryId;

use crate::db::CategoryRepository;
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extract::{Json, Query};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryParams {
    pub id: CategoryId,
}

/// `GET /categories` - all categories, alphabetically.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(Json(Envelope::ok(categories)))
}

/// `POST /categories` - create a category. Conflicts on duplicate name.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(request): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_owned()));
    }

    let category = CategoryRepository::new(state.pool())
        .create(&request.name, request.description.as_deref())
        .await?;

    Ok(Json(Envelope::ok(category)))
}

/// `DELETE /categories?id=` - delete a category; products fall back to
/// no category.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<DeleteCategoryParams>,
) -> Result<impl IntoResponse> {
    let deleted = CategoryRepository::new(state.pool())
        .delete(params.id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("category".to_owned()));
    }

    Ok(Json(Envelope::done("category deleted")))
}
