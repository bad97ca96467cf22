use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and signing configuration for [`crate::ChainLogClient`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// Hex-encoded secp256k1 private key for the wallet submitting logs.
    pub signer_key: String,
    /// Address of the deployed audit contract.
    pub contract_address: String,
    /// Number of confirmations to wait for after submission.
    pub confirmations: u64,
    /// Multiplier applied to the estimated gas limit as a safety margin.
    pub gas_margin_multiplier: f64,
    /// Timeout for a single RPC call (estimate, read).
    pub call_timeout: Duration,
    /// Timeout waiting for a submitted transaction's receipt.
    pub receipt_timeout: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".into(),
            signer_key: String::new(),
            contract_address: "0x0000000000000000000000000000000000000000".into(),
            confirmations: 1,
            gas_margin_multiplier: 1.2,
            call_timeout: Duration::from_secs(15),
            receipt_timeout: Duration::from_secs(20),
        }
    }
}
