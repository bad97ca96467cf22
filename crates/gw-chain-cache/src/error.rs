use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// The refresh's backing read from the chain client failed.
    #[error("refresh failed: {0}")]
    RefreshFailed(#[from] gw_chain::ChainError),
}
