//! `/monad/*` — read access to the chain-log cache projection, plus the
//! authenticated endpoint that forces a refresh out of band.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use gw_chain::AuditRecord;
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

const DEFAULT_LIMIT: usize = 20;

pub async fn stats(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.pipeline.cache().stats().await)
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    limit: Option<usize>,
}

pub async fn trending(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<TrendingQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let tags = state.pipeline.cache().trending_tags(limit).await;
    let body: Vec<_> = tags.into_iter().map(|t| serde_json::json!({ "tag": t.tag, "count": t.count })).collect();
    Json(body)
}

#[derive(Debug, Deserialize)]
pub struct MonadSearchRequest {
    tags: Option<String>,
    title: Option<String>,
    op_type: Option<u8>,
    limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct MonadSearchResponse {
    results: Vec<AuditRecord>,
    num_results: usize,
    source: &'static str,
}

pub async fn search(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<MonadSearchRequest>,
) -> ServerResult<impl IntoResponse> {
    let limit = request.limit.unwrap_or(DEFAULT_LIMIT);
    let results = if let Some(tags) = request.tags.as_deref().filter(|t| !t.is_empty()) {
        state.pipeline.cache().search_by_tags(tags, limit).await
    } else if let Some(title) = request.title.as_deref().filter(|t| !t.is_empty()) {
        state.pipeline.cache().search_by_title(title, limit, request.op_type).await
    } else {
        return Err(ServerError::from(memgate::GatewayError::BadRequest(
            "one of 'tags' or 'title' must be provided".to_string(),
        )));
    };

    let num_results = results.len();
    Ok(Json(MonadSearchResponse { results, num_results, source: "cache" }))
}

pub async fn refresh(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let added = state
        .pipeline
        .cache()
        .refresh()
        .await
        .map_err(memgate::GatewayError::from)?;
    Ok(Json(serde_json::json!({ "synced": true, "added": added })))
}
