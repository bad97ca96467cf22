use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ServerError;
use crate::rate_limit::RateLimitConfig;
use crate::state::ServerState;

/// API key authentication. A no-op when `apiKey` is unset (open admission);
/// otherwise requires an exact match in `X-API-Key` or `Authorization: Bearer`.
pub async fn api_key_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if !state.api_key_required() {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get("x-api-key")
        .or_else(|| request.headers().get(AUTHORIZATION))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).to_string());

    match presented {
        Some(key) if state.is_valid_api_key(&key) => Ok(next.run(request).await),
        Some(_) => Err(ServerError::Auth("invalid API key".to_string())),
        None => Err(ServerError::Auth(
            "API key required: send 'X-API-Key' or 'Authorization: Bearer <key>'".to_string(),
        )),
    }
}

/// Applies `config` to `endpoint`'s bucket for the caller's source address
/// (from `ConnectInfo`, falling back to "unknown" — e.g. in tests driven
/// through `tower::ServiceExt::oneshot` without a real socket). Called from
/// a thin per-route closure since `from_fn_with_state` extractors can't
/// carry the endpoint name/config directly.
pub async fn enforce_rate_limit(
    state: Arc<ServerState>,
    endpoint: &'static str,
    config: RateLimitConfig,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let source = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if state.rate_limiter.admit(endpoint, &source, config) {
        Ok(next.run(request).await)
    } else {
        Err(ServerError::RateLimited)
    }
}

/// Injects/propagates `X-Request-Id`.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());
    let mut response = next.run(request).await;
    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();
    let request_id = request.extensions().get::<String>().cloned().unwrap_or_default();

    tracing::info!(method = %method, uri = %uri, request_id = %request_id, "request started");

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = %request_id,
        "request completed"
    );

    response
}
