//! Cached service over a real on-disk SQLite store.

mod common;

use std::sync::Arc;

use user_cache::adapters::sqlite::{initialize_database, SqliteUserRepository};
use user_cache::domain::ports::EntityStore;
use user_cache::{DatabaseConfig, DomainError, User, UserService};

use common::{key, temp_dir};

async fn setup(dir: &tempfile::TempDir) -> (SqliteUserRepository, UserService) {
    let config = DatabaseConfig {
        path: dir.path().join("users.db").display().to_string(),
        ..DatabaseConfig::default()
    };
    let pool = initialize_database(&config).await.expect("database init");
    let repo = SqliteUserRepository::new(pool);
    let service = UserService::new(Arc::new(repo.clone()));
    (repo, service)
}

#[tokio::test]
async fn test_save_assigns_key_and_timestamps() {
    let dir = temp_dir();
    let (repo, service) = setup(&dir).await;

    let saved = service
        .save(User::new("Ada").with_email("ada@example.com"))
        .await
        .unwrap();

    let id = saved.id.expect("assigned key");
    assert!(saved.created_at.is_some());
    assert!(saved.updated_at.is_some());
    assert_eq!(repo.get_by_key(id).await.unwrap(), Some(saved.clone()));
    assert_eq!(service.get(id).await.unwrap(), Some(saved));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_overwrite_keeps_created_at() {
    let dir = temp_dir();
    let (_repo, service) = setup(&dir).await;

    let first = service.save(User::new("A").with_id(key(10))).await.unwrap();
    let second = service.save(User::new("B").with_id(key(10))).await.unwrap();

    assert_eq!(second.id, Some(key(10)));
    assert_eq!(second.name, "B");
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(service.get(key(10)).await.unwrap().unwrap().name, "B");
}

#[tokio::test]
async fn test_delete_removes_row_and_entry() {
    let dir = temp_dir();
    let (repo, service) = setup(&dir).await;

    let saved = service.save(User::new("gone")).await.unwrap();
    let id = saved.id.unwrap();

    service.delete(id).await.unwrap();
    assert!(!service.is_cached(id));
    assert!(repo.get_by_key(id).await.unwrap().is_none());
    assert!(service.get(id).await.unwrap().is_none());

    // Idempotent
    service.delete(id).await.unwrap();
}

#[tokio::test]
async fn test_external_write_is_invisible_until_invalidated() {
    let dir = temp_dir();
    let (repo, service) = setup(&dir).await;

    service.save(User::new("cached").with_id(key(1))).await.unwrap();
    repo.upsert(User::new("external").with_id(key(1))).await.unwrap();

    // Direct store writes bypass the cache.
    assert_eq!(service.get(key(1)).await.unwrap().unwrap().name, "cached");

    service.delete(key(1)).await.unwrap();
    assert!(service.get(key(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_closed_pool_surfaces_store_unavailable() {
    let dir = temp_dir();
    let (repo, service) = setup(&dir).await;
    let saved = service.save(User::new("A").with_id(key(2))).await.unwrap();

    repo.close().await;

    let err = service.get(key(3)).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable(_)));

    let err = service.save(User::new("B").with_id(key(2))).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable(_)));

    // The entry written before the outage is still served.
    assert_eq!(service.get(key(2)).await.unwrap(), Some(saved));
}
