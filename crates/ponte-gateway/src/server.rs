// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the facade.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use ponte_core::{PonteError, StatusEvent};
use ponte_mail::MailChannel;
use ponte_whatsapp::WhatsappChannel;

use crate::cors::{CorsPolicy, cors_middleware};
use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
///
/// One instance is constructed at startup and injected into every handler;
/// there is no free-floating process state.
#[derive(Clone)]
pub struct BridgeState {
    /// Messaging channel adapter.
    pub whatsapp: Arc<WhatsappChannel>,
    /// Mail channel adapter.
    pub mail: Arc<MailChannel>,
    /// Status transition feed for WebSocket subscribers.
    pub status_tx: broadcast::Sender<StatusEvent>,
}

/// Bridge server configuration (mirrors `BridgeConfig` from ponte-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Cross-origin access policy.
    pub cors: CorsPolicy,
}

/// Assemble the facade router.
///
/// Exposed separately from [`start_server`] so tests can drive the full
/// middleware/handler stack without binding a socket.
pub fn build_router(state: BridgeState, cors: CorsPolicy) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/qr", get(handlers::get_qr))
        .route("/config/mail", post(handlers::post_config_mail))
        .route("/send-whatsapp", post(handlers::post_send_whatsapp))
        .route("/send-email", post(handlers::post_send_email))
        .route("/ws", get(ws::ws_handler))
        .layer(axum_middleware::from_fn_with_state(cors, cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the bridge HTTP/WebSocket server.
///
/// Binds the configured address and serves until `cancel` fires, then shuts
/// down gracefully. A bind conflict is reported as [`PonteError::PortInUse`]
/// so the supervisor can print an operator-facing diagnostic and exit.
pub async fn start_server(
    config: &ServerConfig,
    state: BridgeState,
    cancel: CancellationToken,
) -> Result<(), PonteError> {
    let app = build_router(state, config.cors.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            PonteError::PortInUse { addr: addr.clone() }
        } else {
            PonteError::Channel {
                message: format!("failed to bind bridge to {addr}: {e}"),
                source: Some(Box::new(e)),
            }
        }
    })?;

    tracing::info!("bridge listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| PonteError::Channel {
            message: format!("bridge server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
