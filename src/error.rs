use thiserror::Error;

/// Unified error type for the gateway.
///
/// Each variant carries its recovery policy: `UpstreamUnavailable` is
/// recovered inside the pipeline (generation proceeds without web context),
/// `Cache` is degraded to a miss by the response cache, and `Provider` is a
/// hard failure for the request it occurred in. No variant is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The web-search provider was unreachable, timed out, or returned a
    /// non-success status. Never surfaced to the HTTP client.
    #[error("search provider unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Transport, authentication, or rate-limit failure from the generation
    /// provider. Propagated to the caller as a request failure.
    #[error("generation provider error: {0}")]
    Provider(String),

    /// The shared cache store could not be reached or rejected an operation.
    #[error("cache store error: {0}")]
    Cache(String),

    /// The inbound request was rejected before entering the pipeline.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Missing or unusable process configuration at startup.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether the pipeline is allowed to continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UpstreamUnavailable(_) | Error::Cache(_))
    }
}
