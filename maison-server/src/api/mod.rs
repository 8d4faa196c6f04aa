//! API Routes
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`orders`] - checkout, listing, admin transitions, cancel/refund
//! - [`payments`] - gateway endpoints (Stripe intent + webhook, PayPal)
//! - [`returns`] - return requests
//! - [`settings`] - runtime payment toggles

pub mod health;
pub mod orders;
pub mod payments;
pub mod returns;
pub mod settings;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(payments::router())
        .merge(returns::router())
        .merge(settings::router())
}
