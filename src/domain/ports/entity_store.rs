//! Entity store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EntityId, User};

/// A value that can live in an [`EntityStore`] and in the entity cache.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Key the entity is stored under, `None` until the store assigns one.
    fn key(&self) -> Option<EntityId>;

    /// Attribute validation applied before a write reaches the store.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for User {
    fn key(&self) -> Option<EntityId> {
        self.id
    }

    fn validate(&self) -> Result<(), String> {
        User::validate(self)
    }
}

/// Keyed persistent store for a single entity type.
///
/// Implementations are assumed durable and consistent with themselves.
/// Absence is reported as `Ok(None)`; `Err` always means the store could
/// not answer.
#[async_trait]
pub trait EntityStore: Send + Sync {
    type Entity: Entity;

    /// Fetch an entity by key.
    async fn get_by_key(&self, key: EntityId) -> DomainResult<Option<Self::Entity>>;

    /// Insert or replace an entity and return the stored value.
    ///
    /// When the entity has no key the store assigns one. The returned value
    /// is authoritative: it carries the assigned key and any defaults the
    /// store applied.
    async fn upsert(&self, entity: Self::Entity) -> DomainResult<Self::Entity>;

    /// Delete an entity by key. Deleting a missing key is not an error.
    async fn delete_by_key(&self, key: EntityId) -> DomainResult<()>;
}
