//! Return API Module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/returns | POST | owner or admin |
//! | /api/returns/my | GET | owner |
//! | /api/returns/{id} | GET | owner or admin |
//! | /api/returns/{id}/status | PATCH | admin |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/returns", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/my", get(handler::list_my))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
}
