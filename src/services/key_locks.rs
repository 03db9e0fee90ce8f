//! Striped per-key lock table with mutation generations.
//!
//! Each key hashes to one stripe. A stripe pairs an async mutex with a
//! generation counter that is bumped, under the mutex, every time a cache
//! mutation for any key in the stripe commits. Readers that populate the
//! cache compare generations to detect a mutation that landed while they
//! were reading the store.
//!
//! Every bump also advances a table-wide epoch and stamps it on the stripe.
//! A writer that does not yet know its key (the store assigns it) snapshots
//! the epoch before writing, then asks the stripe it ends up on whether
//! anything committed there after the snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::models::EntityId;

#[derive(Debug, Default)]
struct Stripe {
    lock: Mutex<()>,
    generation: AtomicU64,
    /// Epoch of the most recent bump on this stripe.
    last_epoch: AtomicU64,
}

/// Fixed-size table of per-key async locks.
#[derive(Debug)]
pub struct KeyLocks {
    stripes: Box<[Stripe]>,
    epoch: AtomicU64,
}

impl KeyLocks {
    /// Create a table with `stripes` locks (at least one).
    pub fn new(stripes: usize) -> Self {
        let stripes = (0..stripes.max(1)).map(|_| Stripe::default()).collect();
        Self {
            stripes,
            epoch: AtomicU64::new(0),
        }
    }

    /// Number of stripes in the table.
    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    /// Current generation of the stripe owning `key`.
    pub fn generation(&self, key: EntityId) -> u64 {
        self.stripe(key).generation.load(Ordering::Acquire)
    }

    /// Table-wide count of committed mutations, across all stripes.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Acquire the stripe owning `key`.
    pub async fn lock(&self, key: EntityId) -> KeyGuard<'_> {
        let stripe = self.stripe(key);
        let guard = stripe.lock.lock().await;
        KeyGuard {
            stripe,
            epoch: &self.epoch,
            _guard: guard,
        }
    }

    fn stripe(&self, key: EntityId) -> &Stripe {
        // Keys are positive, and consecutive keys land on different stripes.
        let index = key.get().unsigned_abs() % self.stripes.len() as u64;
        &self.stripes[usize::try_from(index).unwrap_or(0)]
    }
}

/// Exclusive hold on one stripe.
pub struct KeyGuard<'a> {
    stripe: &'a Stripe,
    epoch: &'a AtomicU64,
    _guard: MutexGuard<'a, ()>,
}

impl KeyGuard<'_> {
    /// Generation of the held stripe.
    pub fn generation(&self) -> u64 {
        self.stripe.generation.load(Ordering::Acquire)
    }

    /// Whether a mutation committed on the held stripe after `epoch` was
    /// read from [`KeyLocks::epoch`].
    pub fn mutated_since(&self, epoch: u64) -> bool {
        self.stripe.last_epoch.load(Ordering::Acquire) > epoch
    }

    /// Record that a cache mutation committed under this guard.
    pub fn bump(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.stripe.generation.fetch_add(1, Ordering::AcqRel);
        self.stripe.last_epoch.fetch_max(epoch, Ordering::AcqRel);
    }
}
