//! Content-addressed response cache: key derivation, pluggable backends,
//! and the degradation-aware store wrapper.

pub mod backend;
pub mod key;
pub mod store;

pub use backend::{CacheBackend, MemoryCache, RedisCache};
pub use key::{derive, CacheKey};
pub use store::ResponseCache;
