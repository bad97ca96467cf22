use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::CircuitBreakerConfig;

/// Connection and policy configuration for [`crate::VectorStoreClient`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorConfig {
    /// Base URL of the vector-search canister's HTTP gateway.
    pub canister_base_url: String,
    /// Long-lived identity presented on every call.
    pub identity_key: String,
    /// Endpoint of the collaborator embedding service used to turn raw text
    /// into the vector the canister indexes on.
    pub embedding_service_url: String,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Multiplier applied to `k` when over-fetching to survive principal
    /// post-filtering. Must be at least 3.
    pub search_ceiling_multiplier: usize,
    pub circuit_breaker: CircuitBreakerConfig,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            canister_base_url: "http://localhost:8787".into(),
            identity_key: String::new(),
            embedding_service_url: "http://localhost:8788/embed".into(),
            timeout: Duration::from_secs(8),
            search_ceiling_multiplier: 3,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}
