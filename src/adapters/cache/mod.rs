//! In-memory caching layer for entity reads.
//!
//! Uses `moka` for concurrent, unbounded caching. Ordering of cache
//! mutations is handled by `CachedEntityService`, not here.

pub mod moka_cache_store;

pub use moka_cache_store::MokaCacheStore;
