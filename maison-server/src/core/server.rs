//! Server Implementation
//!
//! Router assembly and the serve loop.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};
use crate::realtime::{SocketNotifier, build_socket_layer};
use crate::utils::{AppError, AppResult};

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Run with pre-built state (tests and embedded setups)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> AppResult<()> {
        // The socket layer exists before the state so the notifier can
        // publish into it from the very first request.
        let (socket_layer, io) = build_socket_layer();
        let notifier = Arc::new(SocketNotifier::new(io));

        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(self.config.clone(), notifier).await?,
        };

        let app = api::router()
            .with_state(state)
            .layer(socket_layer)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Maison server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}
