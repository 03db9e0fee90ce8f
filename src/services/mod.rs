//! Service layer: the caching component in front of the entity store.

pub mod cache_stats;
pub mod cached_entity_service;
pub mod key_locks;

pub use cache_stats::{CacheStats, CacheStatsSnapshot};
pub use cached_entity_service::CachedEntityService;
pub use key_locks::{KeyGuard, KeyLocks};

use crate::domain::models::User;
use crate::domain::ports::EntityStore;

/// Any user store, erased so the transport and CLI layers can pick SQLite
/// or the in-memory store at runtime.
pub type DynUserStore = dyn EntityStore<Entity = User>;

/// Cached user service over an erased store.
pub type UserService = CachedEntityService<DynUserStore>;
