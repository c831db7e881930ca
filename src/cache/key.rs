//! Cache key derivation.
//!
//! Keys are content-addressed: mode tag plus the normalized query feed a
//! SHA-256 digest, prefixed with a fixed namespace so gateway entries never
//! collide with unrelated keys in a shared store.

use sha2::{Digest, Sha256};

use crate::types::Mode;

/// Namespace prefix for every gateway cache key. Versioned so a change to
/// the derivation scheme invalidates old entries instead of aliasing them.
const KEY_NAMESPACE: &str = "fiscal:answer:v1:";

/// Opaque, fixed-length cache identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the cache key for a (query, mode) pair.
///
/// Normalization is lowercase plus trim, so whitespace and case variants of
/// the same question collapse to one key. Pure and deterministic.
pub fn derive(query: &str, mode: Mode) -> CacheKey {
    let normalized = query.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(mode.tag().as_bytes());
    hasher.update(b"|");
    hasher.update(normalized.as_bytes());
    let hash: String = hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect();
    CacheKey(format!("{KEY_NAMESPACE}{hash}"))
}
