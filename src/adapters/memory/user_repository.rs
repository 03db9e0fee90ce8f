//! In-memory user repository.
//!
//! Behaves like the SQLite store (key assignment, timestamps, idempotent
//! delete) without touching disk.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EntityId, User};
use crate::domain::ports::EntityStore;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<EntityId, User>,
    last_id: i64,
}

/// `EntityStore` over a `BTreeMap`. Assigned keys are never reused.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
    /// Empty store; the first assigned key is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Whether no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.users.is_empty()
    }
}

#[async_trait]
impl EntityStore for InMemoryUserRepository {
    type Entity = User;

    async fn get_by_key(&self, key: EntityId) -> DomainResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&key).cloned())
    }

    async fn upsert(&self, mut user: User) -> DomainResult<User> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        let id = match user.id {
            Some(id) => {
                inner.last_id = inner.last_id.max(id.get());
                id
            }
            None => {
                inner.last_id += 1;
                EntityId::new(inner.last_id)?
            }
        };

        user.id = Some(id);
        user.created_at = inner
            .users
            .get(&id)
            .and_then(|existing| existing.created_at)
            .or(Some(now));
        user.updated_at = Some(now);

        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_key(&self, key: EntityId) -> DomainResult<()> {
        self.inner.write().await.users.remove(&key);
        Ok(())
    }
}
