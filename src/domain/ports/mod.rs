//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EntityStore: Keyed persistence for a single entity type
//! - CacheStore: In-memory map backing the entity cache
//!
//! These traits keep the caching service independent of SQLite and moka.

pub mod cache_store;
pub mod entity_store;

pub use cache_store::CacheStore;
pub use entity_store::{Entity, EntityStore};
