//! Chat-completion client that conditions replies on retrieved memories.
//!
//! Prompt assembly and token-budget truncation are pure ([`prompt`]); the
//! network call layered on top retries only on 5xx/transport failures.

mod client;
mod config;
mod error;
mod prompt;
mod retry;
mod types;

pub use client::LlmClient;
pub use config::{LlmConfig, RetryConfig};
pub use error::LlmError;
pub use prompt::SYSTEM_PROMPT;
pub use types::ContextBlock;
