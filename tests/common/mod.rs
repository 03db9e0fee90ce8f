//! Common test utilities for integration tests
//!
//! Provides a store wrapper that counts calls and can be told to fail,
//! plus small fixtures shared across test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use user_cache::adapters::memory::InMemoryUserRepository;
use user_cache::domain::ports::EntityStore;
use user_cache::{DomainError, DomainResult, EntityId, User, UserService};

/// In-memory user store that records how often each operation reached it.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryUserRepository,
    pub gets: AtomicUsize,
    pub upserts: AtomicUsize,
    pub deletes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Read straight from the backing store, bypassing counters and faults.
    pub async fn peek(&self, key: EntityId) -> Option<User> {
        self.inner.get_by_key(key).await.ok().flatten()
    }

    /// Write straight to the backing store, as another process would.
    pub async fn upsert_direct(&self, user: User) -> User {
        self.inner.upsert(user).await.expect("in-memory upsert")
    }

    fn outage() -> DomainError {
        DomainError::StoreUnavailable("injected outage".to_string())
    }
}

#[async_trait]
impl EntityStore for CountingStore {
    type Entity = User;

    async fn get_by_key(&self, key: EntityId) -> DomainResult<Option<User>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.get_by_key(key).await
    }

    async fn upsert(&self, entity: User) -> DomainResult<User> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.upsert(entity).await
    }

    async fn delete_by_key(&self, key: EntityId) -> DomainResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.delete_by_key(key).await
    }
}

/// Build a user service over a fresh counting store.
pub fn counting_service() -> (Arc<CountingStore>, UserService) {
    let store = Arc::new(CountingStore::new());
    let service = UserService::new(store.clone());
    (store, service)
}

pub fn key(raw: i64) -> EntityId {
    EntityId::new(raw).expect("test keys are positive")
}

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Initializes a tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
