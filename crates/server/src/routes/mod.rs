//! HTTP route handlers for the dashboard API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (pings the database)
//!
//! # Auth
//! POST /auth/register             - Create a customer account
//! POST /auth/login                - Login, returns a bearer token
//!
//! # Orders
//! POST   /orders                  - Place an order (authenticated)
//! GET    /orders                  - List orders, filter by userId/status (admin)
//! GET    /orders/{id}             - Enriched order detail (owner or admin)
//! PUT    /orders                  - Update order status (admin)
//! DELETE /orders?id=              - Hard-delete an order (admin)
//!
//! # Catalog
//! GET    /products                - List products, filter by categoryId
//! GET    /products/{id}           - Product detail
//! POST   /products                - Create product (admin)
//! PUT    /products                - Update product (admin)
//! DELETE /products?id=            - Delete product (admin)
//! GET    /categories              - List categories
//! POST   /categories              - Create category (admin)
//! DELETE /categories?id=          - Delete category (admin)
//!
//! # Users
//! GET    /users                   - List users (admin)
//! GET    /users/{id}              - User detail (admin)
//! DELETE /users?id=               - Delete a user; their orders remain (admin)
//!
//! # Notifications
//! GET  /notifications             - Own plus broadcast notifications
//! POST /notifications             - Create notification (admin)
//! PUT  /notifications/{id}/read   - Mark as read
//!
//! # Settings
//! GET  /settings/{key}            - Read a setting
//! PUT  /settings/{key}            - Create or replace a setting (admin)
//! ```

pub mod auth;
pub mod categories;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod settings;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Upper bound on page size; larger requests are clamped, not rejected.
const MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Resolve optional `page`/`limit` query parameters to `(page, limit, offset)`
/// with defaults and clamping.
#[must_use]
pub fn page_window(page: Option<u32>, limit: Option<u32>) -> (u32, u32, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let offset = u64::from(page - 1) * u64::from(limit);

    (page, limit, offset)
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(orders::create)
                .get(orders::index)
                .put(orders::update_status)
                .delete(orders::remove),
        )
        .route("/{id}", get(orders::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::index)
                .post(products::create)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/{id}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(categories::index)
            .post(categories::create)
            .delete(categories::remove),
    )
}

/// Create the user administration routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).delete(users::remove))
        .route("/{id}", get(users::show))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index).post(notifications::create))
        .route("/{id}/read", put(notifications::mark_read))
}

/// Create the settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/{key}", get(settings::show).put(settings::put))
}

/// Create all routes for the dashboard API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/users", user_routes())
        .nest("/notifications", notification_routes())
        .nest("/settings", settings_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(None, None), (1, 10, 0));
    }

    #[test]
    fn test_page_window_offset() {
        assert_eq!(page_window(Some(3), Some(25)), (3, 25, 50));
    }

    #[test]
    fn test_page_window_clamped() {
        assert_eq!(page_window(Some(0), Some(10_000)), (1, MAX_PAGE_LIMIT, 0));
    }
}
