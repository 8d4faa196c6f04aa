//! Order API Module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders | POST | owner |
//! | /api/orders | GET | admin |
//! | /api/orders/my | GET | owner |
//! | /api/orders/stats | GET | admin |
//! | /api/orders/{id} | GET | owner or admin |
//! | /api/orders/{id}/status | PATCH | admin |
//! | /api/orders/{id}/cancel | PATCH | owner or admin |
//! | /api/orders/{id}/refund | POST | admin |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/my", get(handler::list_my))
        .route("/stats", get(handler::stats))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/cancel", patch(handler::cancel))
        .route("/{id}/refund", post(handler::refund))
}
