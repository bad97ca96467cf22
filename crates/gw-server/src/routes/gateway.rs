//! `/insert`, `/search`, `/chat` — the three pipeline flows, thinly wrapped.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use memgate::{ChatRequest, InsertRequest, SearchRequest};

use crate::error::ServerResult;
use crate::state::ServerState;

pub async fn insert(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<InsertRequest>,
) -> ServerResult<impl IntoResponse> {
    let request_id = Uuid::new_v4().to_string();
    let response = state.pipeline.insert(&request_id, request).await?;
    Ok(Json(response))
}

pub async fn search(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SearchRequest>,
) -> ServerResult<impl IntoResponse> {
    let request_id = Uuid::new_v4().to_string();
    let response = state.pipeline.search(&request_id, request).await?;
    Ok(Json(response))
}

pub async fn chat(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ChatRequest>,
) -> ServerResult<impl IntoResponse> {
    let request_id = Uuid::new_v4().to_string();
    let response = state.pipeline.chat(&request_id, request).await?;
    Ok(Json(response))
}
