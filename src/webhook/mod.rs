//! Webhook HTTP surface.
//!
//! ## URL layout
//!
//! ```text
//! POST /fulfillment   — conversational platform entry point
//! GET  /api/health    — liveness
//! ```
//!
//! [`serve`] drives the axum event loop; the caller's [`CancellationToken`]
//! is wired to axum's graceful shutdown.

mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::push::Notifier;
use crate::session::SessionStore;

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — all fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub bot_name: Arc<str>,
    /// Intent re-triggered when a notification fires; also names the
    /// session-params slot the permission outcome arrives in.
    pub notification_intent: Arc<str>,
    pub store: Arc<dyn SessionStore>,
    pub notifier: Arc<Notifier>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/fulfillment", post(handlers::fulfillment))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}

/// Bind and serve until the shutdown token fires.
pub async fn serve(
    bind_addr: &str,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Webhook(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "webhook listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Webhook(format!("server error: {e}")))?;

    info!("webhook shut down");
    Ok(())
}
