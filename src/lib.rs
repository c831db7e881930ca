//! # fiscal-gateway
//!
//! An HTTP gateway that answers Spanish tax questions by routing them to an
//! LLM provider, with a content-addressed response cache and optional
//! web-search augmentation for time-sensitive queries.
//!
//! ## Request flow
//!
//! A query and a mode enter the pipeline; a namespaced SHA-256 key is
//! derived from the normalized pair and the shared cache is probed. A hit
//! returns the stored answer with no provider work. A miss runs the
//! augmentation check (fixed trigger terms), optionally fetches web
//! snippets, invokes the mode's generation profile, and writes the answer
//! back with the mode's lifetime.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Key derivation, redis/memory backends, degradation-aware store |
//! | [`augment`] | Trigger-term check for web-context augmentation |
//! | [`search`] | Web snippet fetcher (Tavily-style API) |
//! | [`provider`] | Per-mode generation profiles and the chat-completions call |
//! | [`pipeline`] | The per-request state machine tying the stages together |
//! | [`metrics`] | Process-wide atomic usage counters |
//! | [`server`] | axum routes: `POST /ask`, `GET /metrics`, `GET /health` |
//! | [`config`] | Environment-driven startup configuration |

pub mod augment;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod provider;
pub mod search;
pub mod server;
pub mod types;

pub use config::GatewayConfig;
pub use error::Error;
pub use pipeline::{AskOutcome, Gateway};
pub use types::Mode;

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, Error>;
