//! Orchestrates the vector, chain, cache, and LLM clients into the three
//! request flows, owning ordering, error policy, and the observability
//! wrapper around each flow.

mod chat;
mod insert;
mod search;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gw_chain::ChainLogClient;
use gw_chain_cache::ChainLogCache;
use gw_llm::LlmClient;
use gw_vector::VectorStoreClient;

use crate::error::GatewayError;
use crate::observability::{
    emit, metrics_recorder, redact_principal, PipelineEvent, PipelineEventStatus, PipelineFlow,
};
use crate::types::{ChatRequest, ChatResponse, InsertRequest, InsertResponse, SearchRequest, SearchResponse};

const DEFAULT_TOTAL_DEADLINE: Duration = Duration::from_secs(30);
const CHAT_TOTAL_DEADLINE: Duration = Duration::from_secs(40);

/// Holds the backend clients a request needs and dispatches the three flows.
/// Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct RequestPipeline {
    vector: Arc<VectorStoreClient>,
    chain: Arc<ChainLogClient>,
    cache: Arc<ChainLogCache>,
    llm: Arc<LlmClient>,
}

impl RequestPipeline {
    pub fn new(
        vector: Arc<VectorStoreClient>,
        chain: Arc<ChainLogClient>,
        cache: Arc<ChainLogCache>,
        llm: Arc<LlmClient>,
    ) -> Self {
        Self { vector, chain, cache, llm }
    }

    /// The chain-log projection backing `/monad/*` reads. Exposed so
    /// `gw-server` can serve cache-backed routes and drive the background
    /// refresh loop without reaching around the pipeline.
    pub fn cache(&self) -> &ChainLogCache {
        &self.cache
    }

    /// The live chain client, for `/stats` and `/health`.
    pub fn chain(&self) -> &ChainLogClient {
        &self.chain
    }

    pub async fn insert(&self, request_id: &str, request: InsertRequest) -> Result<InsertResponse, GatewayError> {
        let principal = request.principal.clone();
        observe(PipelineFlow::Insert, request_id, principal.as_deref(), DEFAULT_TOTAL_DEADLINE, insert::run(self, request)).await
    }

    pub async fn search(&self, request_id: &str, request: SearchRequest) -> Result<SearchResponse, GatewayError> {
        let principal = request.principal.clone();
        observe(PipelineFlow::Search, request_id, principal.as_deref(), DEFAULT_TOTAL_DEADLINE, search::run(self, request)).await
    }

    pub async fn chat(&self, request_id: &str, request: ChatRequest) -> Result<ChatResponse, GatewayError> {
        let principal = request.principal.clone();
        observe(PipelineFlow::Chat, request_id, principal.as_deref(), CHAT_TOTAL_DEADLINE, chat::run(self, request)).await
    }
}

/// Wrap `future` with the request deadline and emit one [`PipelineEvent`]
/// (plus a metrics callback, if one is installed) regardless of outcome.
async fn observe<F, T>(
    flow: PipelineFlow,
    request_id: &str,
    principal: Option<&str>,
    deadline: Duration,
    future: F,
) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    let started = Instant::now();
    let outcome = match tokio::time::timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(format!("{flow} exceeded its {deadline:?} deadline"))),
    };
    let latency = started.elapsed();

    emit(PipelineEvent {
        flow,
        status: if outcome.is_ok() { PipelineEventStatus::Success } else { PipelineEventStatus::Failure },
        latency,
        request_id: request_id.to_string(),
        principal_hash: redact_principal(principal),
        error: outcome.as_ref().err().map(ToString::to_string),
    });

    if let Some(metrics) = metrics_recorder() {
        let result = outcome.as_ref().map(|_| ()).map_err(ToString::to_string);
        match flow {
            PipelineFlow::Insert => metrics.record_insert(latency, &result),
            PipelineFlow::Search => metrics.record_search(latency, &result),
            PipelineFlow::Chat => metrics.record_chat(latency, &result),
        }
    }

    outcome
}
