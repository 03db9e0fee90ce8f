//! Cache store port.

use async_trait::async_trait;

use crate::domain::models::EntityId;

/// Key/value map holding the last-known value per entity key.
///
/// The store has no opinion on consistency; ordering of mutations is the
/// caller's job.
#[async_trait]
pub trait CacheStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: EntityId) -> Option<V>;

    /// Insert or overwrite the entry for `key`.
    async fn insert(&self, key: EntityId, value: V);

    /// Remove the entry for `key` if there is one.
    async fn invalidate(&self, key: EntityId);

    fn contains(&self, key: EntityId) -> bool;
}
