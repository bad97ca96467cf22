use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid chat request: {0}")]
    InvalidInput(String),

    /// Transport failure or a 5xx from the provider, after retries were
    /// exhausted.
    #[error("llm backend unavailable: {0}")]
    RemoteUnavailable(String),

    /// A 4xx from the provider. Never retried.
    #[error("llm backend rejected request: {0}")]
    RemoteRejected(String),

    #[error("timed out waiting for llm response")]
    Timeout,
}
