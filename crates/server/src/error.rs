//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; every failure body is an [`Envelope`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::db::orders::PlacementError;
use crate::envelope::Envelope;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the dashboard API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement or administration failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Database(e) => matches!(
                e,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
            ),
            Self::Auth(e) => matches!(e, AuthError::PasswordHash | AuthError::Repository(_)),
            Self::Order(e) => matches!(
                e,
                OrderError::Repository(_) | OrderError::Placement(PlacementError::Repository(_))
            ),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials
                | AuthError::MissingCredentials
                | AuthError::InvalidToken
                | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(err) => match err {
                OrderError::Validation(_) => StatusCode::BAD_REQUEST,
                OrderError::Placement(placement) => match placement {
                    PlacementError::InsufficientStock { .. }
                    | PlacementError::UnknownProduct(_) => StatusCode::BAD_REQUEST,
                    PlacementError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                },
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details never reach the client.
        let message = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_owned(),
                RepositoryError::Conflict(what) => what.clone(),
                _ => "Internal server error".to_owned(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::MissingCredentials => "Authentication required".to_owned(),
                AuthError::InvalidToken => "Invalid token".to_owned(),
                AuthError::ExpiredToken => "Token expired".to_owned(),
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    "Internal server error".to_owned()
                }
            },
            Self::Order(err) => match err {
                OrderError::Placement(PlacementError::InsufficientStock {
                    product_id,
                    requested,
                    available,
                }) => format!(
                    "insufficient stock for product {product_id}: requested {requested}, available {available}"
                ),
                OrderError::Placement(PlacementError::UnknownProduct(product_id)) => {
                    format!("unknown product {product_id}")
                }
                _ => "Internal server error".to_owned(),
            },
            Self::NotFound(what) => format!("{what} not found"),
            Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_owned(),
        };

        // Validation failures additionally carry the per-field list.
        let body = if let Self::Order(OrderError::Validation(errors)) = self {
            Envelope::invalid("validation failed", errors)
        } else {
            Envelope::failure(message)
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::envelope::FieldError;
    use storekeeper_core::ProductId;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("order".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Forbidden("admin only".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::BadRequest("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::WeakPassword("too short".to_owned()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::ExpiredToken)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_placement_errors_are_bad_request() {
        assert_eq!(
            status_of(AppError::Order(OrderError::Placement(
                PlacementError::InsufficientStock {
                    product_id: ProductId::generate(),
                    requested: 5,
                    available: 2,
                }
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Order(OrderError::Placement(
                PlacementError::UnknownProduct(ProductId::generate())
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err = AppError::Order(OrderError::Validation(vec![FieldError::new(
            "items",
            "at least one item is required",
        )]));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }
}
