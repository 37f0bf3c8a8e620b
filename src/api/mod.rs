//! HTTP API server for the sway gateway
//!
//! A small JSON surface over the speech session: submit an utterance,
//! list voices, check liveness. Utterances are serialized by the session
//! lock, so concurrent `/speak` callers queue.

pub mod health;
pub mod speak;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::speech::SpeechSession;
use crate::{Error, Result};

/// Shared state for API handlers
pub struct ApiState {
    /// The utterance orchestrator; one per process
    pub session: Arc<SpeechSession>,
}

/// Build the full application router.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(speak::router(state))
        .merge(health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server until interrupted.
///
/// # Errors
///
/// Returns error if the server fails to bind or run
pub async fn serve(state: Arc<ApiState>, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

    tracing::info!(port, "API server listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::Config(format!("API server error: {e}")))?;

    Ok(())
}
