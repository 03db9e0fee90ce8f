//! Consistency tests for the cached user service.
//!
//! Store traffic is observed through `CountingStore`, so every test can
//! tell whether an answer came from the cache or from the store.

mod common;

use std::sync::Arc;

use common::{counting_service, key};
use user_cache::{DomainError, User};

#[tokio::test]
async fn test_save_get_delete_walkthrough() {
    let (store, service) = counting_service();

    let saved = service.save(User::new("A").with_id(key(1))).await.unwrap();
    assert_eq!(store.upserts(), 1);

    let got = service.get(key(1)).await.unwrap().unwrap();
    assert_eq!(got, saved);
    assert_eq!(got.name, "A");
    assert_eq!(store.gets(), 0);

    service.save(User::new("B").with_id(key(1))).await.unwrap();
    let got = service.get(key(1)).await.unwrap().unwrap();
    assert_eq!(got.name, "B");
    assert_eq!(store.gets(), 0);

    service.delete(key(1)).await.unwrap();
    assert!(service.get(key(1)).await.unwrap().is_none());
    assert_eq!(store.gets(), 1);
}

#[tokio::test]
async fn test_unknown_key_is_absent_and_uncached() {
    let (store, service) = counting_service();

    assert!(service.get(key(42)).await.unwrap().is_none());
    assert!(!service.is_cached(key(42)));

    // A record appearing later is visible on the next read.
    store.upsert_direct(User::new("late").with_id(key(42))).await;
    let got = service.get(key(42)).await.unwrap().unwrap();
    assert_eq!(got.name, "late");
    assert_eq!(store.gets(), 2);
}

#[tokio::test]
async fn test_read_through_populates_once() {
    let (store, service) = counting_service();
    store.upsert_direct(User::new("Grace").with_id(key(5))).await;

    for _ in 0..3 {
        let got = service.get(key(5)).await.unwrap().unwrap();
        assert_eq!(got.name, "Grace");
    }

    assert_eq!(store.gets(), 1);
    let stats = service.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.populates, 1);
}

#[tokio::test]
async fn test_save_without_key_caches_assigned_key() {
    let (store, service) = counting_service();

    let saved = service.save(User::new("fresh")).await.unwrap();
    let id = saved.id.expect("store assigns a key");

    assert!(service.is_cached(id));
    assert_eq!(service.get(id).await.unwrap().unwrap(), saved);
    assert_eq!(store.gets(), 0);
}

#[tokio::test]
async fn test_delete_forces_store_read() {
    let (store, service) = counting_service();
    service.save(User::new("A").with_id(key(3))).await.unwrap();

    service.delete(key(3)).await.unwrap();
    assert!(!service.is_cached(key(3)));

    assert!(service.get(key(3)).await.unwrap().is_none());
    assert_eq!(store.gets(), 1);
    assert_eq!(store.deletes(), 1);
}

#[tokio::test]
async fn test_delete_missing_key_succeeds() {
    let (store, service) = counting_service();

    service.delete(key(77)).await.unwrap();
    assert_eq!(store.deletes(), 1);
    assert_eq!(service.stats().invalidations, 1);
}

#[tokio::test]
async fn test_failed_upsert_leaves_cache_untouched() {
    let (store, service) = counting_service();
    let original = service.save(User::new("A").with_id(key(1))).await.unwrap();

    store.fail_writes(true);
    let err = service
        .save(User::new("B").with_id(key(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable(_)));

    store.fail_writes(false);
    let got = service.get(key(1)).await.unwrap().unwrap();
    assert_eq!(got, original);
    assert_eq!(store.gets(), 0);
}

#[tokio::test]
async fn test_failed_upsert_on_uncached_key_stays_uncached() {
    let (store, service) = counting_service();

    store.fail_writes(true);
    assert!(service.save(User::new("A").with_id(key(9))).await.is_err());
    assert!(!service.is_cached(key(9)));
}

#[tokio::test]
async fn test_failed_delete_keeps_entry() {
    let (store, service) = counting_service();
    let saved = service.save(User::new("A").with_id(key(2))).await.unwrap();

    store.fail_writes(true);
    let err = service.delete(key(2)).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable(_)));
    assert!(service.is_cached(key(2)));

    store.fail_writes(false);
    assert_eq!(service.get(key(2)).await.unwrap().unwrap(), saved);
}

#[tokio::test]
async fn test_failed_read_is_not_cached_as_absence() {
    let (store, service) = counting_service();
    store.upsert_direct(User::new("A").with_id(key(4))).await;

    store.fail_reads(true);
    let err = service.get(key(4)).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable(_)));
    assert!(!service.is_cached(key(4)));

    store.fail_reads(false);
    let got = service.get(key(4)).await.unwrap().unwrap();
    assert_eq!(got.name, "A");
    assert_eq!(store.gets(), 2);
}

#[tokio::test]
async fn test_invalid_user_never_reaches_store() {
    let (store, service) = counting_service();

    let err = service
        .save(User::new("   ").with_id(key(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));

    let err = service
        .save(User::new("A").with_email("not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationFailed(_)));

    assert_eq!(store.upserts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_leave_cache_equal_to_store() {
    let (store, service) = counting_service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..32 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .save(User::new(format!("writer-{i}")).with_id(key(1)))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let in_store = store.peek(key(1)).await.unwrap();
    let cached = service.get(key(1)).await.unwrap().unwrap();
    assert_eq!(cached, in_store);
    assert_eq!(store.gets(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_traffic_never_leaves_stale_entry() {
    let (store, service) = counting_service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..60 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let id = key(1 + (i % 3));
            match i % 4 {
                0 => service
                    .save(User::new(format!("v{i}")).with_id(id))
                    .await
                    .map(|_| ()),
                1 => service.delete(id).await,
                _ => service.get(id).await.map(|_| ()),
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for raw in 1..=3 {
        let id = key(raw);
        if service.is_cached(id) {
            let cached = service.get(id).await.unwrap();
            assert_eq!(cached, store.peek(id).await, "stale entry for {id}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_keyless_saves_racing_deletes_stay_consistent() {
    let (store, service) = counting_service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..40 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                service.save(User::new(format!("anon-{i}"))).await.map(|_| ())
            } else {
                service.delete(key(1 + i / 2)).await
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for raw in 1..=20 {
        let id = key(raw);
        if service.is_cached(id) {
            let cached = service.get(id).await.unwrap();
            assert_eq!(cached, store.peek(id).await, "stale entry for {id}");
        }
    }
}
