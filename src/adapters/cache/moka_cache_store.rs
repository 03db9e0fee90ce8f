//! Unbounded `CacheStore` backed by a moka future cache.
//!
//! No capacity and no TTL are configured, so entries only leave the cache
//! through explicit invalidation.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

use crate::domain::models::EntityId;
use crate::domain::ports::CacheStore;

/// Moka-backed entity cache.
///
/// Values are held behind `Arc` so hits only clone a pointer inside moka.
pub struct MokaCacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    entries: Cache<EntityId, Arc<V>>,
}

impl<V> MokaCacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Empty cache with no capacity bound and no expiry.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Approximate number of entries. Pending maintenance may lag behind
    /// recent writes.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl<V> Default for MokaCacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> CacheStore<V> for MokaCacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: EntityId) -> Option<V> {
        self.entries.get(&key).await.map(|cached| (*cached).clone())
    }

    async fn insert(&self, key: EntityId, value: V) {
        self.entries.insert(key, Arc::new(value)).await;
    }

    async fn invalidate(&self, key: EntityId) {
        self.entries.invalidate(&key).await;
    }

    fn contains(&self, key: EntityId) -> bool {
        self.entries.contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: i64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_get_invalidate() {
        let store: MokaCacheStore<String> = MokaCacheStore::new();

        assert!(store.get(key(1)).await.is_none());

        store.insert(key(1), "a".to_string()).await;
        assert_eq!(store.get(key(1)).await.as_deref(), Some("a"));
        assert!(store.contains(key(1)));

        store.insert(key(1), "b".to_string()).await;
        assert_eq!(store.get(key(1)).await.as_deref(), Some("b"));

        store.invalidate(key(1)).await;
        assert!(store.get(key(1)).await.is_none());
        assert!(!store.contains(key(1)));
    }

    #[tokio::test]
    async fn test_invalidate_missing_key_is_noop() {
        let store: MokaCacheStore<String> = MokaCacheStore::new();
        store.invalidate(key(99)).await;
        assert!(!store.contains(key(99)));
    }
}
