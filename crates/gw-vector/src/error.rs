//! Errors surfaced by [`crate::VectorStoreClient`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    /// A request parameter failed validation before any network call was made.
    #[error("invalid vector-store request: {0}")]
    InvalidInput(String),

    /// Transport-level failure: connection refused, DNS failure, TLS error,
    /// or the canister call timed out.
    #[error("vector store unreachable: {0}")]
    RemoteUnavailable(String),

    /// The canister was reached but refused the call (logical rejection, not
    /// a transport fault).
    #[error("vector store rejected request: {0}")]
    RemoteRejected(String),

    /// The client's configured identity was rejected by the canister.
    #[error("vector store rejected identity: {0}")]
    Authority(String),

    /// The breaker for this client is open; the call was not attempted.
    #[error("vector store circuit breaker open")]
    CircuitOpen,
}
