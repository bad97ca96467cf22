//! Router assembly, middleware stack, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use metrics_exporter_prometheus::PrometheusBuilder;

use memgate::{GatewayConfig, RequestPipeline};

use crate::config::ServerConfig;
use crate::middleware::{api_key_auth, enforce_rate_limit, log_requests, request_id};
use crate::rate_limit::RateLimitConfig;
use crate::routes::{api_info, gateway, health, monad, not_found};
use crate::state::ServerState;

/// Bodies larger than this are rejected before deserialization — sized for
/// a single memory entry, not a batch upload.
const MAX_BODY_BYTES: usize = 128 * 1024;

/// Wraps [`enforce_rate_limit`] with a fixed endpoint name and quota so it
/// can be registered with `from_fn_with_state`, whose extractor-shaped
/// signature has no room for extra arguments.
fn rate_limit_layer(
    endpoint: &'static str,
    config: RateLimitConfig,
) -> impl Fn(axum::extract::State<Arc<ServerState>>, Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<axum::response::Response, crate::error::ServerError>> + Send>>
       + Clone {
    move |axum::extract::State(state): axum::extract::State<Arc<ServerState>>, req: Request, next: Next| {
        Box::pin(enforce_rate_limit(state, endpoint, config, req, next))
    }
}

/// A wildcard `allow_origin` is forbidden once `apiKey` is set — an open CORS
/// policy would let any page on the web ride a visitor's browser credentials
/// straight through the key check. With an API key configured and no
/// `allowedOrigins` list, no origin is allowed; an explicit allow-list is
/// required to enable browser cross-origin access.
fn build_cors(config: &GatewayConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        if config.api_key.is_some() {
            return CorsLayer::new().allow_methods([Method::GET, Method::POST]).allow_headers(Any);
        }
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = build_cors(&state.gateway_config);
    let limits = state.gateway_config.rate_limits;

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health))
        .route("/stats", get(health::stats))
        .route("/monad/stats", get(monad::stats))
        .route("/monad/trending", get(monad::trending))
        .route("/monad/search", post(monad::search))
        .route("/metrics", get(health::metrics));

    let insert_layer = rate_limit_layer("insert", RateLimitConfig::per_minute(limits.insert_per_minute));
    let search_layer = rate_limit_layer("search", RateLimitConfig::per_minute(limits.search_per_minute));
    let chat_layer = rate_limit_layer("chat", RateLimitConfig::per_minute(limits.chat_per_minute));
    let refresh_layer = rate_limit_layer("refresh", RateLimitConfig::per_minute(limits.refresh_per_minute));

    // Each route gets its own `Router` and a single `layer()` call so its
    // quota wraps only that route — `Router::layer` wraps every route
    // already added to the router it's called on, so sharing one router
    // across `.route().layer()` pairs would bind every route below the
    // tightest quota instead of its own.
    let insert_route = Router::new()
        .route("/insert", post(gateway::insert))
        .layer(from_fn_with_state(state.clone(), insert_layer));
    let search_route = Router::new()
        .route("/search", post(gateway::search))
        .layer(from_fn_with_state(state.clone(), search_layer));
    let chat_route = Router::new()
        .route("/chat", post(gateway::chat))
        .layer(from_fn_with_state(state.clone(), chat_layer));
    let refresh_route = Router::new()
        .route("/monad/refresh", post(monad::refresh))
        .layer(from_fn_with_state(state.clone(), refresh_layer));

    let protected_routes = Router::new()
        .merge(insert_route)
        .merge(search_route)
        .merge(chat_route)
        .merge(refresh_route)
        .layer(from_fn_with_state(state.clone(), api_key_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, state.server_config.timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(gateway_config: GatewayConfig, server_config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&server_config.log_level)
        .with_target(false)
        .json()
        .init();

    let metrics_handle = if server_config.metrics_enabled {
        Some(PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };
    if metrics_handle.is_some() {
        memgate::observability::set_pipeline_metrics(std::sync::Arc::new(crate::metrics::GatewayMetrics));
    }

    let pipeline = build_pipeline(&gateway_config)?;
    let state = Arc::new(ServerState::new(pipeline, gateway_config, server_config.clone(), metrics_handle));

    spawn_cache_refresh_loop(state.clone());

    let app = build_router(state);
    let addr: SocketAddr = server_config.socket_addr()?;

    tracing::info!(%addr, timeout_secs = server_config.timeout_secs, "starting memgate server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

fn build_pipeline(config: &GatewayConfig) -> anyhow::Result<RequestPipeline> {
    let vector = Arc::new(gw_vector::VectorStoreClient::new(config.vector_config()));
    let chain = Arc::new(gw_chain::ChainLogClient::new(config.chain_config())?);
    let cache = Arc::new(gw_chain_cache::ChainLogCache::new(chain.clone()));
    let llm = Arc::new(gw_llm::LlmClient::new(config.llm_config()));

    Ok(RequestPipeline::new(vector, chain, cache, llm))
}

/// Background loop refreshing the chain-log projection on a fixed interval.
/// Writes don't force a refresh themselves.
fn spawn_cache_refresh_loop(state: Arc<ServerState>) {
    let interval = state.gateway_config.cache_refresh_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match state.pipeline.cache().refresh().await {
                Ok(added) if added > 0 => tracing::info!(added, "chain-log cache refreshed"),
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "chain-log cache refresh failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
