//! Centralized, typed startup configuration — every field here feeds one
//! collaborator below via constructor injection.

use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use gw_chain::ChainConfig;
use gw_llm::LlmConfig;
use gw_vector::VectorConfig;

fn default_allowed_origins() -> Vec<String> {
    Vec::new()
}

fn default_canister_base_url() -> String {
    VectorConfig::default().canister_base_url
}

fn default_embedding_service_url() -> String {
    VectorConfig::default().embedding_service_url
}

fn default_rpc_url() -> String {
    ChainConfig::default().rpc_url
}

fn default_contract_address() -> String {
    ChainConfig::default().contract_address
}

fn default_llm_api_url() -> String {
    LlmConfig::default().api_url
}

fn default_llm_model() -> String {
    LlmConfig::default().model
}

fn default_cache_refresh_interval_secs() -> u64 {
    30
}

fn default_rate_limits() -> RateLimits {
    RateLimits::default()
}

/// Per-endpoint token-bucket ceilings, expressed as requests/minute. Any
/// endpoint not named here is unlimited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimits {
    pub insert_per_minute: u32,
    pub search_per_minute: u32,
    pub chat_per_minute: u32,
    pub refresh_per_minute: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            insert_per_minute: 20,
            search_per_minute: 30,
            chat_per_minute: 10,
            refresh_per_minute: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Absent disables admission auth entirely: every request passes.
    #[serde(default)]
    pub api_key: Option<String>,

    /// CORS allow-list, exact-match, scheme-sensitive. Empty means "no
    /// allow-list configured" — `gw-server` treats that as permissive for
    /// local development.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default)]
    pub signer_key: String,
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    #[serde(default = "default_canister_base_url")]
    pub canister_base_url: String,
    #[serde(default)]
    pub identity_key: String,
    #[serde(default = "default_embedding_service_url")]
    pub embedding_service_url: String,

    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,
    #[serde(default)]
    pub llm_api_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_rate_limits")]
    pub rate_limits: RateLimits,

    #[serde(default = "default_cache_refresh_interval_secs")]
    pub cache_refresh_interval_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            allowed_origins: default_allowed_origins(),
            rpc_url: default_rpc_url(),
            signer_key: String::new(),
            contract_address: default_contract_address(),
            canister_base_url: default_canister_base_url(),
            identity_key: String::new(),
            embedding_service_url: default_embedding_service_url(),
            llm_api_url: default_llm_api_url(),
            llm_api_key: String::new(),
            llm_model: default_llm_model(),
            rate_limits: default_rate_limits(),
            cache_refresh_interval_secs: default_cache_refresh_interval_secs(),
        }
    }
}

impl GatewayConfig {
    /// Load from `gateway.{toml,yaml,json,...}` (if present) layered with
    /// `GATEWAY__*` environment variables, after loading a `.env` file.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name("gateway").required(false))
            .add_source(Environment::with_prefix("GATEWAY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn cache_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.cache_refresh_interval_secs)
    }

    pub fn vector_config(&self) -> VectorConfig {
        VectorConfig {
            canister_base_url: self.canister_base_url.clone(),
            identity_key: self.identity_key.clone(),
            embedding_service_url: self.embedding_service_url.clone(),
            ..VectorConfig::default()
        }
    }

    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            rpc_url: self.rpc_url.clone(),
            signer_key: self.signer_key.clone(),
            contract_address: self.contract_address.clone(),
            ..ChainConfig::default()
        }
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_url: self.llm_api_url.clone(),
            api_key: self.llm_api_key.clone(),
            model: self.llm_model.clone(),
            ..LlmConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_open_admission() {
        let config = GatewayConfig::default();
        assert!(config.api_key.is_none());
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn default_rate_limits_match_wire_contract() {
        let limits = RateLimits::default();
        assert_eq!(limits.insert_per_minute, 20);
        assert_eq!(limits.search_per_minute, 30);
        assert_eq!(limits.chat_per_minute, 10);
        assert_eq!(limits.refresh_per_minute, 5);
    }

    #[test]
    fn cache_refresh_interval_defaults_to_thirty_seconds() {
        let config = GatewayConfig::default();
        assert_eq!(config.cache_refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn sub_configs_carry_through_the_fields_they_own() {
        let config = GatewayConfig {
            canister_base_url: "https://canister.example".into(),
            identity_key: "id-1".into(),
            ..GatewayConfig::default()
        };
        let vector_config = config.vector_config();
        assert_eq!(vector_config.canister_base_url, "https://canister.example");
        assert_eq!(vector_config.identity_key, "id-1");
    }
}
