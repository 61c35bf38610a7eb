//! User administration handlers. Admin-only.

use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;

use storekeeper_core::UserId;

use crate::db::UserRepository;
use crate::envelope::{Envelope, Pagination};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path, Query};
use crate::middleware::RequireAdmin;
use crate::routes::page_window;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserParams {
    pub id: UserId,
}

/// `GET /users` - paginated user listing.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse> {
    let (page, limit, offset) = page_window(params.page, params.limit);

    let (users, total) = UserRepository::new(state.pool()).list(limit, offset).await?;

    Ok(Json(Envelope::paginated(
        users,
        Pagination::new(page, limit, total),
    )))
}

/// `GET /users/{id}` - user detail.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<impl IntoResponse> {
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_owned()))?;

    Ok(Json(Envelope::ok(user)))
}

/// `DELETE /users?id=` - delete a user account.
///
/// The user's orders are kept; the ledger survives the account.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(identity): RequireAdmin,
    Query(params): Query<DeleteUserParams>,
) -> Result<impl IntoResponse> {
    if params.id == identity.user_id {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_owned(),
        ));
    }

    let deleted = UserRepository::new(state.pool()).delete(params.id).await?;

    if !deleted {
        return Err(AppError::NotFound("user".to_owned()));
    }

    tracing::info!(user_id = %params.id, "user deleted");

    Ok(Json(Envelope::done("user deleted")))
}
