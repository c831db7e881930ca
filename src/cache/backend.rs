//! Cache backend implementations.
//!
//! `RedisCache` is the production backend: a shared store addressable by
//! every gateway instance, with expiry installed atomically alongside the
//! value (`SET ... EX`). `MemoryCache` serves single-process deployments and
//! tests; expiry there is lazy, checked on read.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::key::CacheKey;
use crate::{Error, Result};

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()>;
    fn name(&self) -> &'static str;
}

struct MemoryEntry {
    value: String,
    created_at: Instant,
    ttl: Duration,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// In-process backend with lazy expiry. Entries over the capacity push out
/// the oldest live entry.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    fn evict_if_needed(&self, entries: &mut HashMap<String, MemoryEntry>) {
        entries.retain(|_, e| !e.is_expired());
        while entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => entries.remove(&k),
                None => break,
            };
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Cache("memory cache lock poisoned".into()))?;
        if let Some(entry) = entries.get(key.as_str()) {
            if entry.is_expired() {
                entries.remove(key.as_str());
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Cache("memory cache lock poisoned".into()))?;
        self.evict_if_needed(&mut entries);
        entries.insert(
            key.as_str().to_string(),
            MemoryEntry {
                value: value.to_string(),
                created_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Shared-store backend over redis. The connection manager reconnects on its
/// own; every operation error is reported as `Error::Cache` and left to the
/// store layer's degradation policy.
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| Error::Cache(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| Error::Cache(e.to_string()))?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let mut con = self.manager.clone();
        con.get(key.as_str())
            .await
            .map_err(|e| Error::Cache(e.to_string()))
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<()> {
        let mut con = self.manager.clone();
        // SET with EX installs value and expiry in one command; no reader can
        // observe the key without its expiration applied.
        redis::cmd("SET")
            .arg(key.as_str())
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut con)
            .await
            .map_err(|e| Error::Cache(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
