//! Remote client for the semantic vector-search canister.
//!
//! Wraps `insert`/`search` RPCs (each fronted by a call to a collaborator
//! embedding service) behind a circuit breaker. This crate never retries —
//! that policy belongs to whatever pipeline drives it.

mod client;
mod config;
mod error;
mod resilience;
mod types;

pub use client::VectorStoreClient;
pub use config::VectorConfig;
pub use error::VectorError;
pub use resilience::{CircuitBreakerConfig, CircuitState};
pub use types::{InsertOutcome, SearchHit};
