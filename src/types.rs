//! Request/response bodies for the three pipeline flows.
//!
//! Field names match the external wire contract verbatim, including the
//! `kinic_result`/`monad_tx` nicknames for the vector-canister and chain-log
//! legs of a request.

use serde::{Deserialize, Serialize};

use gw_metadata::Metadata;
use gw_vector::{InsertOutcome, SearchHit};

#[derive(Debug, Clone, Deserialize)]
pub struct InsertRequest {
    pub content: String,
    pub user_tags: Option<String>,
    pub principal: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertResponse {
    pub kinic_result: InsertOutcome,
    pub monad_tx: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: Option<usize>,
    pub principal: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub monad_tx: Option<String>,
    pub num_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub top_k: Option<usize>,
    pub principal: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub memories_used: Vec<SearchHit>,
    pub num_memories: usize,
    pub monad_tx: Option<String>,
}
