//! Notification handlers.

use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;

use storekeeper_core::{NotificationId, UserId};

use crate::db::NotificationRepository;
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// Notification creation request. Without `user_id` the notification is a
/// broadcast visible to everyone.
#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub title: String,
    pub body: String,
}

/// `GET /notifications` - the caller's notifications plus broadcasts.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<impl IntoResponse> {
    let notifications = NotificationRepository::new(state.pool())
        .list_for_user(identity.user_id)
        .await?;

    Ok(Json(Envelope::ok(notifications)))
}

/// `POST /notifications` - create a notification or broadcast.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(request): Json<NotificationRequest>,
) -> Result<impl IntoResponse> {
    if request.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_owned()));
    }

    let notification = NotificationRepository::new(state.pool())
        .create(request.user_id, &request.title, &request.body)
        .await?;

    Ok(Json(Envelope::ok(notification)))
}

/// `PUT /notifications/{id}/read` - mark one of the caller's notifications
/// as read.
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<impl IntoResponse> {
    NotificationRepository::new(state.pool())
        .mark_read(id, identity.user_id)
        .await?;

    Ok(Json(Envelope::done("notification marked as read")))
}
