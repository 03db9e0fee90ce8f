//! Read-through / write-through / write-invalidate cache over an `EntityStore`.
//!
//! - `get` answers from the cache when it can; on a miss it reads the store
//!   and caches what it found. Absence is never cached.
//! - `save` writes the store first, then overwrites the cache entry with the
//!   value the store returned.
//! - `delete` deletes from the store, then drops the cache entry.
//!
//! A failed store call never mutates the cache.
//!
//! Save and delete hold the key's stripe lock from before the store call
//! until the cache is updated, so cache updates for a key happen in the same
//! order as the store writes that produced them. A get miss reads the store
//! without the lock and only populates if no save or delete committed on
//! the stripe while it was reading. A save whose final key was not locked
//! during the store write (the store assigned it, or changed it) caches its
//! value only if nothing committed on that key's stripe since the write
//! began; otherwise it drops the entry so the next get reads through.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::cache_stats::{CacheStats, CacheStatsSnapshot};
use super::key_locks::{KeyGuard, KeyLocks};
use crate::adapters::cache::MokaCacheStore;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CacheConfig, EntityId};
use crate::domain::ports::{CacheStore, Entity, EntityStore};

/// Cache-fronted access to an [`EntityStore`].
pub struct CachedEntityService<S, C = MokaCacheStore<<S as EntityStore>::Entity>>
where
    S: EntityStore + ?Sized,
    C: CacheStore<S::Entity>,
{
    store: Arc<S>,
    cache: C,
    locks: KeyLocks,
    stats: CacheStats,
}

impl<S> CachedEntityService<S>
where
    S: EntityStore + ?Sized,
{
    /// Wrap `store` with an unbounded moka cache and default lock striping.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, &CacheConfig::default())
    }

    /// Wrap `store` with an unbounded moka cache sized by `config`.
    pub fn with_config(store: Arc<S>, config: &CacheConfig) -> Self {
        Self::with_cache(store, MokaCacheStore::new(), config.lock_stripes)
    }
}

impl<S, C> CachedEntityService<S, C>
where
    S: EntityStore + ?Sized,
    C: CacheStore<S::Entity>,
{
    /// Wrap `store` with a caller-supplied cache and `lock_stripes` locks.
    pub fn with_cache(store: Arc<S>, cache: C, lock_stripes: usize) -> Self {
        Self {
            store,
            cache,
            locks: KeyLocks::new(lock_stripes),
            stats: CacheStats::default(),
        }
    }

    /// Look up an entity, reading through to the store on a miss.
    ///
    /// Returns `Ok(None)` when the store has no such entity. Store failures
    /// are returned as-is and leave no trace in the cache.
    #[instrument(skip(self))]
    pub async fn get(&self, id: EntityId) -> DomainResult<Option<S::Entity>> {
        if let Some(hit) = self.cache.get(id).await {
            self.stats.record_hit();
            debug!("cache hit");
            return Ok(Some(hit));
        }
        self.stats.record_miss();

        let observed = self.locks.generation(id);
        let fetched = self.store.get_by_key(id).await.inspect_err(|err| {
            warn!(error = %err, "store read failed");
        })?;

        let Some(entity) = fetched else {
            debug!("cache miss, not found in store");
            return Ok(None);
        };

        let guard = self.locks.lock(id).await;
        if guard.generation() == observed {
            self.cache.insert(id, entity.clone()).await;
            self.stats.record_populate();
            debug!("cache miss, populated from store");
        } else {
            // A save or delete on this stripe committed after our read began.
            self.stats.record_skipped_populate();
            debug!("cache miss, populate skipped after concurrent mutation");
        }

        Ok(Some(entity))
    }

    /// Persist an entity and cache the stored value.
    ///
    /// The returned entity is the store's authoritative copy, including a
    /// newly assigned key when the input had none.
    #[instrument(skip(self, entity), fields(key = ?entity.key()))]
    pub async fn save(&self, entity: S::Entity) -> DomainResult<S::Entity> {
        entity.validate().map_err(DomainError::ValidationFailed)?;

        let requested = entity.key();
        let held = match requested {
            Some(id) => Some(self.locks.lock(id).await),
            None => None,
        };
        // Must be read before the store write.
        let epoch = self.locks.epoch();

        let stored = self.store.upsert(entity).await.inspect_err(|err| {
            warn!(error = %err, "store write failed, cache untouched");
        })?;

        let key = stored.key().ok_or_else(|| {
            DomainError::StoreUnavailable("store returned an entity without a key".to_string())
        })?;

        let guard = match held {
            Some(guard) if requested == Some(key) => guard,
            other => {
                drop(other);
                let guard = self.locks.lock(key).await;
                if guard.mutated_since(epoch) {
                    // Possibly newer than our write: drop the entry instead.
                    self.cache.invalidate(key).await;
                    guard.bump();
                    self.stats.record_skipped_write();
                    debug!(%key, "write-through skipped after concurrent mutation");
                    return Ok(stored);
                }
                guard
            }
        };

        self.commit_insert(&guard, key, stored.clone()).await;
        debug!(%key, "write-through complete");
        Ok(stored)
    }

    /// Delete an entity from the store and invalidate its cache entry.
    ///
    /// Deleting a key that does not exist succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: EntityId) -> DomainResult<()> {
        let guard = self.locks.lock(id).await;

        self.store.delete_by_key(id).await.inspect_err(|err| {
            warn!(error = %err, "store delete failed, cache untouched");
        })?;

        self.cache.invalidate(id).await;
        guard.bump();
        self.stats.record_invalidation();
        debug!("write-invalidate complete");
        Ok(())
    }

    /// Whether an entry for `id` is currently cached.
    pub fn is_cached(&self, id: EntityId) -> bool {
        self.cache.contains(id)
    }

    /// Snapshot of the hit/miss/write counters.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// The wrapped store. Writes made through it bypass the cache.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn commit_insert(&self, guard: &KeyGuard<'_>, key: EntityId, value: S::Entity) {
        self.cache.insert(key, value).await;
        guard.bump();
        self.stats.record_write();
    }
}
