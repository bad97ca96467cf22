use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use memgate::{GatewayConfig, RequestPipeline};

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;

/// Shared application state threaded through every handler.
#[derive(Clone)]
pub struct ServerState {
    pub pipeline: Arc<RequestPipeline>,
    pub gateway_config: Arc<GatewayConfig>,
    pub server_config: Arc<ServerConfig>,
    pub rate_limiter: Arc<RateLimiter>,
    /// `None` when `server_config.metrics_enabled` is false at startup.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl ServerState {
    pub fn new(
        pipeline: RequestPipeline,
        gateway_config: GatewayConfig,
        server_config: ServerConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            gateway_config: Arc::new(gateway_config),
            server_config: Arc::new(server_config),
            rate_limiter: Arc::new(RateLimiter::new()),
            metrics_handle,
        }
    }

    pub fn api_key_required(&self) -> bool {
        self.gateway_config.api_key.is_some()
    }

    pub fn is_valid_api_key(&self, presented: &str) -> bool {
        self.gateway_config.api_key.as_deref() == Some(presented)
    }
}
