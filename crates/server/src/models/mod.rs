//! Domain types for the Storekeeper API.
//!
//! These are validated domain objects, decoded straight from database rows
//! where the mapping is one-to-one. Wire-only request/response types live
//! next to their route handlers.

pub mod category;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;

pub use category::Category;
pub use notification::Notification;
pub use order::{EnrichedOrder, EnrichedOrderItem, NewOrder, NewOrderItem, Order, OrderItem};
pub use product::Product;
pub use user::{Identity, User};
