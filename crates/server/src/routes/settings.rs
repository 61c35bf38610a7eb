//! Settings handlers, backed by the cached settings service.

use axum::{extract::State, response::IntoResponse};
use serde_json::Value as JsonValue;

use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// `GET /settings/{key}` - read a setting, possibly from cache.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(key): Path<String>,
) -> Result<impl IntoResponse> {
    let value = state
        .settings()
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("setting {key}")))?;

    Ok(Json(Envelope::ok(value)))
}

/// `PUT /settings/{key}` - create or replace a setting.
pub async fn put(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(key): Path<String>,
    Json(value): Json<JsonValue>,
) -> Result<impl IntoResponse> {
    state.settings().put(&key, value.clone()).await?;

    Ok(Json(Envelope::ok(value)))
}
