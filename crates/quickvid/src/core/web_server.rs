//! Liveness HTTP server.
//!
//! `/healthcheck` keeps the JSON shape load balancers already probe for;
//! `/health` is the plain-text variant.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
    pub version: String,
}

/// Body of `GET /healthcheck`. An empty version is reported as `"OK"`.
pub fn health_payload(version: &str) -> HealthPayload {
    let version = if version.trim().is_empty() { "OK" } else { version };
    HealthPayload {
        status: "up",
        version: version.to_string(),
    }
}

#[derive(Clone)]
struct WebState {
    version: Arc<str>,
}

pub fn router(version: &str) -> Router {
    let state = WebState {
        version: Arc::from(version),
    };
    Router::new()
        .route("/healthcheck", get(healthcheck_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind `addr` and serve until the process exits.
pub async fn start_web_server(addr: &str, version: &str) -> AppResult<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Starting health server on http://{}", listener.local_addr()?);
    serve(listener, version).await
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, version: &str) -> AppResult<()> {
    axum::serve(listener, router(version)).await?;
    Ok(())
}

/// GET /healthcheck
async fn healthcheck_handler(State(state): State<WebState>) -> Json<HealthPayload> {
    Json(health_payload(&state.version))
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
