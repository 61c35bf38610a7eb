//! Request extractors that keep rejections inside the error taxonomy.
//!
//! axum's stock `Json`/`Query`/`Path` extractors reject malformed input with
//! plain-text bodies and their own status codes (422 for an unknown enum
//! variant, for instance). These wrappers forward to the stock extractors and
//! convert any rejection into [`AppError::BadRequest`], so a client that
//! sends garbage gets the same enveloped 400 as every other client error.
//!
//! Handlers import `Json`/`Query`/`Path` from here instead of `axum`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor. Also wraps JSON responses, like `axum::Json`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string extractor.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// Path segment extractor.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::Value;
    use sqlx::PgPool;
    use tower::ServiceExt;

    use storekeeper_core::{Email, UserId, UserRole};

    use crate::config::ServerConfig;
    use crate::models::Identity;
    use crate::state::AppState;

    // A lazy pool never connects unless a handler touches the database, and
    // these requests all fail at extraction.
    fn state() -> AppState {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            token_secret: SecretString::from("kQ9#mB2$vX7!nC4@pL8&wR1*zF5^jT3%"),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();

        AppState::new(config, pool)
    }

    fn admin_token(state: &AppState) -> String {
        let identity = Identity {
            user_id: UserId::generate(),
            email: Email::parse("admin@example.com").unwrap(),
            role: UserRole::Admin,
        };
        state.tokens().issue(&identity).unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = crate::app(state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        (status, body)
    }

    fn assert_failure_envelope(status: StatusCode, body: &Value) {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], Value::Bool(false));
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_status_variant_gets_enveloped_400() {
        let state = state();
        let token = admin_token(&state);

        let request = Request::builder()
            .method("PUT")
            .uri("/orders")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"id":"6a2f86f3-92c7-4d5a-9f4c-1f9f4f9a0b11","status":"BOGUS"}"#,
            ))
            .unwrap();

        let response = crate::app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_failure_envelope(status, &body);
    }

    #[tokio::test]
    async fn test_non_json_body_gets_enveloped_400() {
        let state = state();
        let token = admin_token(&state);

        let request = Request::builder()
            .method("PUT")
            .uri("/orders")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json at all"))
            .unwrap();

        let response = crate::app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_failure_envelope(status, &body);
    }

    #[tokio::test]
    async fn test_malformed_query_id_gets_enveloped_400() {
        let state = state();
        let token = admin_token(&state);

        let request = Request::builder()
            .method("DELETE")
            .uri("/orders?id=not-a-uuid")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = crate::app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_failure_envelope(status, &body);
    }

    #[tokio::test]
    async fn test_malformed_path_id_gets_enveloped_400() {
        let state = state();
        let token = admin_token(&state);

        let request = Request::builder()
            .method("GET")
            .uri("/orders/not-a-uuid")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = crate::app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_failure_envelope(status, &body);
    }

    #[tokio::test]
    async fn test_unauthenticated_rejection_is_enveloped() {
        let request = Request::builder()
            .method("GET")
            .uri("/orders/6a2f86f3-92c7-4d5a-9f4c-1f9f4f9a0b11")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], Value::Bool(false));
    }
}
