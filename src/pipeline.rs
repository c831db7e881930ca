//! Cache-augmented generation pipeline.
//!
//! Per request: derive key, probe cache, on miss optionally attach web
//! context, generate, write back with the mode's lifetime, record metrics.
//! Each request runs the state machine exactly once; nothing is retried.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::augment;
use crate::cache::{self, ResponseCache};
use crate::metrics::{MetricsRecorder, MetricsSnapshot};
use crate::provider::GenerationInvoker;
use crate::search::{WebContext, WebContextFetcher};
use crate::types::Mode;
use crate::{Error, Result};

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub mode: Mode,
    pub cached: bool,
    pub answer: String,
    /// Provider token accounting; `None` when served from cache.
    pub tokens_used: Option<u64>,
}

/// The gateway: one logically-singleton instance shared by all request
/// handlers. The cache store and the metrics counters are its only mutable
/// shared state, and both handle their own synchronization.
pub struct Gateway {
    cache: ResponseCache,
    search: Option<WebContextFetcher>,
    invoker: GenerationInvoker,
    metrics: MetricsRecorder,
}

impl Gateway {
    /// `search` is optional: without a configured search provider the
    /// augmentation stage is disabled and every query generates from the
    /// base query alone.
    pub fn new(
        cache: ResponseCache,
        search: Option<WebContextFetcher>,
        invoker: GenerationInvoker,
    ) -> Arc<Self> {
        Arc::new(Self {
            cache,
            search,
            invoker,
            metrics: MetricsRecorder::new(),
        })
    }

    /// Answers one query. Validation happens before any counter moves or
    /// any key is derived.
    pub async fn ask(&self, query: &str, mode: Mode) -> Result<AskOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("query must not be empty".into()));
        }

        self.metrics.record_request();
        let request_id = Uuid::new_v4();
        let key = cache::derive(query, mode);

        if let Some(answer) = self.cache.get(&key).await {
            self.metrics.record_hit();
            debug!(%request_id, %mode, %key, "cache hit");
            return Ok(AskOutcome {
                mode,
                cached: true,
                answer,
                tokens_used: None,
            });
        }
        self.metrics.record_miss();
        debug!(%request_id, %mode, %key, "cache miss");

        let context = if augment::needs_context(query) {
            self.fetch_context(query, request_id).await
        } else {
            None
        };

        let generation = self.invoker.generate(query, mode, context.as_ref()).await?;
        self.metrics.add_tokens(generation.tokens_used);

        let ttl = self.invoker.profile(mode).cache_ttl;
        self.cache.put(&key, &generation.answer, ttl).await;
        info!(
            %request_id,
            %mode,
            tokens = generation.tokens_used,
            augmented = context.is_some(),
            "generated answer"
        );

        Ok(AskOutcome {
            mode,
            cached: false,
            answer: generation.answer,
            tokens_used: Some(generation.tokens_used),
        })
    }

    /// Runs the search provider when one is configured. Any failure or an
    /// empty result set degrades to "no context"; the pipeline continues.
    async fn fetch_context(&self, query: &str, request_id: Uuid) -> Option<WebContext> {
        let fetcher = self.search.as_ref()?;
        match fetcher.fetch(query).await {
            Ok(ctx) if !ctx.is_empty() => {
                debug!(%request_id, snippets = ctx.snippets().len(), "web context attached");
                Some(ctx)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(%request_id, error = %e, "search failed, generating without context");
                None
            }
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend_name()
    }
}
