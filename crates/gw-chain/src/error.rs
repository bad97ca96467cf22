//! Errors surfaced by [`crate::ChainLogClient`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// A parameter violated one of the contract's field bounds before any
    /// transaction was built.
    #[error("invalid chain-log request: {0}")]
    InvalidInput(String),

    /// RPC transport failure: node unreachable, connection reset, etc.
    #[error("chain rpc unavailable: {0}")]
    RemoteUnavailable(String),

    /// The signer's balance cannot cover the estimated gas cost.
    #[error("signer has insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The transaction was mined but reverted.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// No receipt arrived within the configured bound.
    #[error("timed out waiting for confirmation after {0:?}")]
    Timeout(std::time::Duration),
}
