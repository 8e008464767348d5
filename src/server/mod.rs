//! HTTP front end for the generation pipeline.
//!
//! ```text
//! POST /run     {"user", "repo" | "name", "type"}  → 200 text/plain
//! GET  /health                                      → 200 "ok"
//! ```
//!
//! Route handlers and error mapping live in [`api`]; this module owns the
//! listener, CORS and graceful shutdown.

pub mod api;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::pipeline::Pipeline;
use api::AppState;

/// Configuration for the HTTP server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    /// Permissive CORS for local front-end development.
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            request_timeout: Duration::from_secs(900),
            dev_mode: false,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    api::api_router().with_state(state)
}

/// Bind and serve until Ctrl+C.
///
/// On shutdown the shared cancellation token fires first, so in-flight
/// requests waiting between chunk summaries return promptly.
pub async fn start_server(config: ServerConfig, pipeline: Pipeline) -> Result<()> {
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState {
        pipeline,
        request_timeout: config.request_timeout,
        shutdown: shutdown.clone(),
    });

    let mut app = build_router(state);
    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "readme-genie listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        // never resolve; the server keeps running without a signal handler
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
    shutdown.cancel();
}
