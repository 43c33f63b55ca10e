//! HTTP adapter over the gateway.
//!
//! Routes:
//! - `GET /` form UI
//! - `GET /health` liveness and configuration summary
//! - `POST /summarize`, `POST /sentiment`, `POST /analyze` with
//!   `{"text": ..., "model": ...}`
//!
//! Empty input and unreadable bodies are 4xx. Gateway failures map to
//! 502/503/504. Every error has an `{"error", "kind"}` body.

mod handlers;
mod page;
mod routes;

pub use handlers::status_for;
pub use routes::create_router;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::gateway::Gateway;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub api_key_configured: bool,
}

impl AppState {
    pub fn new(gateway: Gateway, api_key_configured: bool) -> Self {
        Self {
            gateway: Arc::new(gateway),
            api_key_configured,
        }
    }
}

/// Start the web server and run until the process is stopped.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = bind(host, port).await?;
    run(listener, state).await
}

/// Bind `host:port`. `host` may be a hostname or an IPv4/IPv6 literal.
async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))
}

async fn run(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = listener.local_addr()?;
    tracing::info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
