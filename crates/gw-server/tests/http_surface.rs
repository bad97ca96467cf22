//! End-to-end tests driven through the real router (`build_router`), with
//! the vector canister and its embedding collaborator replaced by `httpmock`
//! doubles. The chain RPC is left pointed at an unreachable address on
//! purpose: chain-log writes are always tolerated on failure (insert/search/chat all
//! swallow a failed `write_log` and still return 200 with `monad_tx: null`),
//! so these tests exercise that path for free rather than standing up a
//! JSON-RPC double. The LLM endpoint is likewise left unreachable — `/chat`
//! is only exercised here for its rate-limit behavior, never for a real
//! answer.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use memgate::GatewayConfig;
use memgate_server::{build_router, ServerConfig, ServerState};

const UNREACHABLE_RPC: &str = "http://127.0.0.1:1";
const DUMMY_CONTRACT: &str = "0x0000000000000000000000000000000000000001";

fn gateway_config(mock_server: &MockServer, api_key: Option<&str>) -> GatewayConfig {
    GatewayConfig {
        api_key: api_key.map(str::to_string),
        canister_base_url: mock_server.base_url(),
        embedding_service_url: format!("{}/embed", mock_server.base_url()),
        rpc_url: UNREACHABLE_RPC.into(),
        contract_address: DUMMY_CONTRACT.into(),
        ..GatewayConfig::default()
    }
}

fn build_state(gateway_config: GatewayConfig) -> Arc<ServerState> {
    let vector = Arc::new(gw_vector::VectorStoreClient::new(gateway_config.vector_config()));
    let chain = Arc::new(gw_chain::ChainLogClient::new(gateway_config.chain_config()).unwrap());
    let cache = Arc::new(gw_chain_cache::ChainLogCache::new(chain.clone()));
    let llm = Arc::new(gw_llm::LlmClient::new(gateway_config.llm_config()));
    let pipeline = memgate::RequestPipeline::new(vector, chain, cache, llm);

    Arc::new(ServerState::new(pipeline, gateway_config, ServerConfig::default(), None))
}

fn mock_embedding(mock_server: &MockServer) {
    mock_server.mock(|when, then| {
        when.method(POST).path("/embed");
        then.status(200).json_body(json!({ "embedding": [0.1, 0.2, 0.3] }));
    });
}

fn mock_canister_insert(mock_server: &MockServer) {
    mock_server.mock(|when, then| {
        when.method(POST).path("/insert");
        then.status(200).json_body(json!({ "stored": true, "id": "rec-1" }));
    });
}

fn mock_canister_search(mock_server: &MockServer, tagged_texts: &[(&str, f32)]) {
    let results: Vec<Value> = tagged_texts
        .iter()
        .map(|(tagged_text, score)| json!({ "tagged_text": tagged_text, "score": score }))
        .collect();
    mock_server.mock(|when, then| {
        when.method(POST).path("/search");
        then.status(200).json_body(json!({ "results": results }));
    });
}

async fn post_json(app: axum::Router, uri: &str, body: Value, api_key: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri).header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, parsed)
}

/// Heading extraction runs on insert, and a chain write against an
/// unreachable RPC is tolerated rather than failing the request.
#[tokio::test]
async fn insert_extracts_heading_and_tolerates_unreachable_chain() {
    let mock_server = MockServer::start();
    mock_embedding(&mock_server);
    mock_canister_insert(&mock_server);

    let state = build_state(gateway_config(&mock_server, None));
    let app = build_router(state);

    let body = json!({
        "content": "# ZKML\nJolt Atlas enables verifiable ML",
        "user_tags": null,
        "principal": null,
    });
    let (status, parsed) = post_json(app, "/insert", body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parsed["metadata"]["title"], "ZKML");
    assert!(parsed["metadata"]["summary"].as_str().unwrap().starts_with("Jolt Atlas enables verifiable ML"));
    assert!(parsed["metadata"]["tags"].as_str().unwrap().contains("zkml"));
    assert!(parsed["monad_tx"].is_null());
}

/// A principal only ever sees search hits tagged for that principal.
#[tokio::test]
async fn search_filters_results_by_principal() {
    let mock_server = MockServer::start();
    mock_embedding(&mock_server);
    mock_canister_search(&mock_server, &[("userA|pets: cats are lovely", 0.9), ("userB|pets: cats are lovely", 0.8)]);

    let state = build_state(gateway_config(&mock_server, None));
    let app = build_router(state);

    let body = json!({ "query": "cats", "top_k": 5, "principal": "userA" });
    let (status, parsed) = post_json(app, "/search", body, None).await;

    assert_eq!(status, StatusCode::OK);
    let results = parsed["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().all(|hit| hit["tag"].as_str().unwrap().starts_with("userA|")));
}

/// Open admission when `apiKey` is unset; 401 without the header and 200
/// with it once an `apiKey` is configured.
#[tokio::test]
async fn auth_is_open_until_an_api_key_is_configured() {
    let mock_server = MockServer::start();
    mock_embedding(&mock_server);
    mock_canister_insert(&mock_server);

    let body = json!({ "content": "hello", "user_tags": null, "principal": null });

    let open_state = build_state(gateway_config(&mock_server, None));
    let (status, _) = post_json(build_router(open_state), "/insert", body.clone(), None).await;
    assert_eq!(status, StatusCode::OK);

    let guarded_state = build_state(gateway_config(&mock_server, Some("secret")));
    let (status, parsed) = post_json(build_router(guarded_state.clone()), "/insert", body.clone(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parsed["kind"], "KindUnauthorized");

    let (status, _) = post_json(build_router(guarded_state), "/insert", body, Some("secret")).await;
    assert_eq!(status, StatusCode::OK);
}

/// The configured per-minute ceiling throttles the caller, not just logs it.
#[tokio::test]
async fn exceeding_the_rate_limit_yields_429() {
    let mock_server = MockServer::start();
    mock_embedding(&mock_server);
    mock_canister_insert(&mock_server);

    let mut config = gateway_config(&mock_server, None);
    config.rate_limits.insert_per_minute = 3;
    let state = build_state(config);
    let app = build_router(state);

    let body = json!({ "content": "hello", "user_tags": null, "principal": null });
    for _ in 0..3 {
        let (status, _) = post_json(app.clone(), "/insert", body.clone(), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, parsed) = post_json(app, "/insert", body, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(parsed["kind"], "KindRateLimited");
}

/// Unauthenticated read routes stay reachable even with an API key configured.
#[tokio::test]
async fn health_and_monad_stats_need_no_auth() {
    let mock_server = MockServer::start();
    let state = build_state(gateway_config(&mock_server, Some("secret")));
    let app = build_router(state);

    let response = app.clone().oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(Request::builder().uri("/monad/stats").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let mock_server = MockServer::start();
    let state = build_state(gateway_config(&mock_server, None));
    let app = build_router(state);

    let response = app.oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
