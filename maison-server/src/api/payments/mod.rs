//! Payment API Module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders/stripe/create-payment-intent | POST | owner |
//! | /api/stripe/webhook | POST | signature |
//! | /api/orders/paypal/create | POST | owner |
//! | /api/orders/paypal/capture | POST | owner |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/orders", gateway_routes())
        .route("/api/stripe/webhook", post(handler::stripe_webhook))
}

fn gateway_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/stripe/create-payment-intent",
            post(handler::create_payment_intent),
        )
        .route("/paypal/create", post(handler::paypal_create))
        .route("/paypal/capture", post(handler::paypal_capture))
}
