//! Client for the EVM audit contract backing the memory-log gateway.
//!
//! Every insert and chat turn is mirrored here as an immutable log entry:
//! this crate is the only thing in the gateway that signs and submits
//! transactions.

mod abi;
mod client;
mod config;
mod error;
mod types;

pub use client::ChainLogClient;
pub use config::ChainConfig;
pub use error::ChainError;
pub use types::{AuditRecord, OpType};
