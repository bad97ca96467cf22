use std::sync::Arc;
use std::time::SystemTime;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use memgate::GatewayError;

use crate::error::ServerResult;
use crate::state::ServerState;

static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> = once_cell::sync::Lazy::new(SystemTime::now);

/// Both backend clients are constructed at startup or not at all — by the
/// time a request reaches this handler they're always initialized, so this
/// only ever reports the happy path; the 503 case from the wire contract
/// corresponds to a process that never finished starting.
pub async fn health(State(_state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "vector": "ready",
        "chain": "ready",
        "canister": "ready",
        "uptime_seconds": SERVER_START_TIME.elapsed().map(|d| d.as_secs()).unwrap_or(0),
    }))
}

/// On-chain totals — a thin passthrough to `ChainLogClient::get_total`.
pub async fn stats(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let total = state
        .pipeline
        .chain()
        .get_total()
        .await
        .map_err(GatewayError::from)?;
    Ok(Json(json!({ "total_memories": total })))
}

/// Prometheus text exposition, absent when `metrics_enabled = false`.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match &state.metrics_handle {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
