//! Database models
//!
//! Serde models for the embedded SurrealDB store. Record links use
//! [`surrealdb::RecordId`] with the string helpers in [`serde_helpers`] so
//! the same model round-trips through both the API (JSON, `"table:id"`
//! strings) and the store (native record ids).

pub mod serde_helpers;

pub mod cart;
pub mod counter;
pub mod order;
pub mod product;
pub mod return_request;
pub mod settings;
pub mod user;

pub use cart::{Cart, CartItem};
pub use counter::Counter;
pub use order::{
    Address, CustomerInfo, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, Refund,
};
pub use product::Product;
pub use return_request::{ReturnItem, ReturnRequest, ReturnStatus};
pub use settings::Settings;
pub use user::User;
