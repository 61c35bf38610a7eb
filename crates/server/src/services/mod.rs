//! Business-logic services sitting between routes and repositories.

pub mod auth;
pub mod orders;
pub mod settings;

pub use auth::{AuthError, AuthService, TokenSigner};
pub use orders::{OrderError, OrderService, PlaceOrderItem, PlaceOrderRequest};
pub use settings::SettingsService;
