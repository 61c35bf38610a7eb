//! Registration and login handlers.

use axum::{extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::Result;
use crate::extract::Json;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the bearer token plus the user's public view.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// `POST /auth/register` - create a customer account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth
        .register(&request.email, &request.password, &request.name)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(Envelope::ok(user)))
}

/// `POST /auth/login` - verify credentials and issue a token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (token, user) = auth.login(&request.email, &request.password).await?;

    Ok(Json(Envelope::ok(LoginResponse { token, user })))
}
