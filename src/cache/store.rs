//! Response cache over a pluggable backend.
//!
//! The cache is a performance optimization, not a correctness dependency:
//! a failed read degrades to a miss and a failed write is logged and
//! dropped, so the answer still reaches the caller.

use std::time::Duration;
use tracing::warn;

use super::backend::CacheBackend;
use super::key::CacheKey;

pub struct ResponseCache {
    backend: Box<dyn CacheBackend>,
}

impl ResponseCache {
    pub fn new(backend: Box<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Probes the cache. Absence, expiry, and backend failure all read the
    /// same from the outside: `None`.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Installs an answer with its expiration. Entries are written once and
    /// never updated in place.
    pub async fn put(&self, key: &CacheKey, answer: &str, ttl: Duration) {
        if let Err(e) = self.backend.set(key, answer, ttl).await {
            warn!(backend = self.backend.name(), error = %e, "cache write failed, dropping entry");
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}
