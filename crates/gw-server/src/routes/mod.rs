//! HTTP endpoint implementations, organized by the flows they front:
//!
//! - `gateway`: `/insert`, `/search`, `/chat` — the three pipeline flows.
//! - `health`: `/health`, `/stats` — liveness and on-chain totals.
//! - `monad`: `/monad/*` — read access to the chain-log cache projection.

pub mod gateway;
pub mod health;
pub mod monad;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// Root endpoint: service info, no authentication.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "memgate",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/insert", "/search", "/chat",
            "/health", "/stats", "/metrics",
            "/monad/stats", "/monad/trending", "/monad/search", "/monad/refresh",
        ]
    })))
}

pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
