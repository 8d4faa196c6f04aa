//! Shared types for the Maison storefront backend
//!
//! Realtime message vocabulary used by both the server and socket clients:
//! topic/room naming, event names, and the payload structures pushed to
//! connected clients.

pub mod message;

// Re-exports
pub use message::{AnalyticsSnapshot, OrderPaymentUpdate, ReturnUpdate, Topic};
