//! HTTP server.
//!
//! Routes:
//! - `POST /api/chat` - relay one chat turn as a frame stream
//! - `DELETE /api/chat?id=` - delete a conversation
//! - `GET /api/history` - list conversations
//! - `GET /api/history/:id` - one conversation with its messages
//! - `GET /health` - liveness

pub mod auth;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::upstream::UpstreamClient;

/// Shared, immutable state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(upstream: UpstreamClient, config: RelayConfig) -> Self {
        Self {
            upstream: Arc::new(upstream),
            config: Arc::new(config),
        }
    }
}

/// CORS for the configured origins; an empty list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/chat", post(routes::chat).delete(routes::delete_chat))
        .route("/api/history", get(routes::history))
        .route("/api/history/:id", get(routes::conversation))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the server on the configured address.
pub async fn start_server(state: AppState) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    let addr = state.config.bind_addr();
    start_server_on(addr, state).await
}

/// Start the server on a specific address.
///
/// Binding to port 0 picks a free port; the bound address is returned.
pub async fn start_server_on(
    addr: SocketAddr,
    state: AppState,
) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    let upstream_url = state.upstream.base_url().to_string();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!(upstream = %upstream_url, "Relay listening on http://{}", actual_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Relay server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}
