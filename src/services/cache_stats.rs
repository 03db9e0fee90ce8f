//! Counters describing how the entity cache is being used.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live cache counters, updated with relaxed atomics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    populates: AtomicU64,
    skipped_populates: AtomicU64,
    writes: AtomicU64,
    skipped_writes: AtomicU64,
    invalidations: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatsSnapshot {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to read the store.
    pub misses: u64,
    /// Misses that found the entity and inserted it.
    pub populates: u64,
    /// Misses whose read raced a save or delete and were not inserted.
    pub skipped_populates: u64,
    /// Saves whose stored value was written to the cache.
    pub writes: u64,
    /// Saves that found a newer mutation on their stripe and dropped the
    /// entry instead of caching their value.
    #[serde(default)]
    pub skipped_writes: u64,
    /// Deletes that removed (or confirmed the absence of) an entry.
    pub invalidations: u64,
}

impl CacheStats {
    /// Count a lookup served from the cache.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a lookup that went to the store.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a miss that inserted what it read.
    pub fn record_populate(&self) {
        self.populates.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a miss that lost a race and did not insert.
    pub fn record_skipped_populate(&self) {
        self.skipped_populates.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a write-through insert.
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a save that invalidated instead of inserting.
    pub fn record_skipped_write(&self) {
        self.skipped_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a delete's invalidation.
    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            populates: self.populates.load(Ordering::Relaxed),
            skipped_populates: self.skipped_populates.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            skipped_writes: self.skipped_writes.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl CacheStatsSnapshot {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = CacheStats::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_write();
        stats.record_skipped_write();

        let snap = stats.snapshot();
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.writes, 1);
        assert_eq!(snap.skipped_writes, 1);
        assert_eq!(snap.invalidations, 0);
        assert!((snap.hit_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_ratio_without_lookups() {
        assert!(CacheStatsSnapshot::default().hit_ratio().abs() < f64::EPSILON);
    }
}
