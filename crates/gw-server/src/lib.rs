//! memgate HTTP gateway — the admission and wire-protocol layer in front of
//! [`memgate::RequestPipeline`].
//!
//! - **Admission**: optional API-key auth (open when unset), per-endpoint
//!   per-source rate limiting, a 128 KiB body ceiling.
//! - **Routing**: `/insert`, `/search`, `/chat` front the three pipeline
//!   flows; `/monad/*` reads the chain-log cache projection; `/health` and
//!   `/stats` are unauthenticated liveness/totals endpoints.
//! - **Errors**: [`ServerError`] is the sole translator from
//!   [`memgate::GatewayError`] kinds to HTTP status codes and wire shape.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use memgate::GatewayConfig;
//! use memgate_server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gateway_config = GatewayConfig::load()?;
//!     let server_config = ServerConfig::load()?;
//!     memgate_server::start_server(gateway_config, server_config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod metrics;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
