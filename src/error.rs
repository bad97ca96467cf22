//! The gateway's single error taxonomy.
//!
//! Every component crate (`gw-vector`, `gw-chain`, `gw-llm`, `gw-metadata`)
//! keeps its own typed error; this enum is where they converge into the kind
//! vocabulary the HTTP boundary translates to status codes. `gw-server`'s
//! `GatewayHttpError` owns that translation — this type stays axum-free so it
//! can be used from anything that embeds the pipeline, not only the HTTP
//! surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    RemoteUnavailable(String),

    #[error("{0}")]
    RemoteRejected(String),

    #[error("{0}")]
    InsufficientFunds(String),

    #[error("{0}")]
    Reverted(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// The `kind` string carried in every error response.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "KindBadRequest",
            GatewayError::Unauthorized(_) => "KindUnauthorized",
            GatewayError::PayloadTooLarge(_) => "KindPayloadTooLarge",
            GatewayError::RateLimited(_) => "KindRateLimited",
            GatewayError::RemoteUnavailable(_) => "KindRemoteUnavailable",
            GatewayError::RemoteRejected(_) => "KindRemoteRejected",
            GatewayError::InsufficientFunds(_) => "KindInsufficientFunds",
            GatewayError::Reverted(_) => "KindReverted",
            GatewayError::Timeout(_) => "KindTimeout",
            GatewayError::Internal(_) => "KindInternal",
        }
    }
}

impl From<gw_metadata::MetadataError> for GatewayError {
    fn from(err: gw_metadata::MetadataError) -> Self {
        match err {
            gw_metadata::MetadataError::EmptyContent => GatewayError::BadRequest(err.to_string()),
        }
    }
}

impl From<gw_vector::VectorError> for GatewayError {
    fn from(err: gw_vector::VectorError) -> Self {
        use gw_vector::VectorError;
        match err {
            VectorError::InvalidInput(msg) => GatewayError::BadRequest(msg),
            VectorError::RemoteUnavailable(msg) => GatewayError::RemoteUnavailable(msg),
            VectorError::RemoteRejected(msg) => GatewayError::RemoteRejected(msg),
            VectorError::Authority(msg) => GatewayError::Unauthorized(msg),
            VectorError::CircuitOpen => {
                GatewayError::RemoteUnavailable("vector store circuit breaker open".into())
            }
        }
    }
}

impl From<gw_chain::ChainError> for GatewayError {
    fn from(err: gw_chain::ChainError) -> Self {
        use gw_chain::ChainError;
        match err {
            ChainError::InvalidInput(msg) => GatewayError::BadRequest(msg),
            ChainError::RemoteUnavailable(msg) => GatewayError::RemoteUnavailable(msg),
            ChainError::InsufficientFunds(msg) => GatewayError::InsufficientFunds(msg),
            ChainError::Reverted(msg) => GatewayError::Reverted(msg),
            ChainError::Timeout(d) => GatewayError::Timeout(format!("chain call timed out after {d:?}")),
        }
    }
}

impl From<gw_llm::LlmError> for GatewayError {
    fn from(err: gw_llm::LlmError) -> Self {
        use gw_llm::LlmError;
        match err {
            LlmError::InvalidInput(msg) => GatewayError::BadRequest(msg),
            LlmError::RemoteUnavailable(msg) => GatewayError::RemoteUnavailable(msg),
            LlmError::RemoteRejected(msg) => GatewayError::RemoteRejected(msg),
            LlmError::Timeout => GatewayError::Timeout("llm call timed out".into()),
        }
    }
}

impl From<gw_chain_cache::CacheError> for GatewayError {
    fn from(err: gw_chain_cache::CacheError) -> Self {
        let gw_chain_cache::CacheError::RefreshFailed(chain_err) = err;
        chain_err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_remote_unavailable_maps_to_remote_unavailable_kind() {
        let err: GatewayError = gw_vector::VectorError::RemoteUnavailable("down".into()).into();
        assert_eq!(err.kind(), "KindRemoteUnavailable");
    }

    #[test]
    fn chain_insufficient_funds_maps_through() {
        let err: GatewayError = gw_chain::ChainError::InsufficientFunds("broke".into()).into();
        assert_eq!(err.kind(), "KindInsufficientFunds");
    }

    #[test]
    fn vector_circuit_open_is_remote_unavailable() {
        let err: GatewayError = gw_vector::VectorError::CircuitOpen.into();
        assert_eq!(err.kind(), "KindRemoteUnavailable");
    }
}
