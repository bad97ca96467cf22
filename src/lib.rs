//! Memory-agent gateway: accepts user content, stores it in a remote
//! vector-search canister, mirrors a compact audit record to an EVM
//! smart-contract log, and retrieves semantically related prior entries to
//! condition an LLM reply — all scoped per principal.
//!
//! This crate owns the request pipeline and its configuration; `gw-server`
//! layers the HTTP surface on top of [`RequestPipeline`].

pub mod config;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod types;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use pipeline::RequestPipeline;
pub use types::{ChatRequest, ChatResponse, InsertRequest, InsertResponse, SearchRequest, SearchResponse};
