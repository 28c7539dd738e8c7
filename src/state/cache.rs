// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Memoized conversion results keyed by the exact input bit pattern.
//!
//! The map is split into independently locked shards so that concurrent
//! callers rarely contend. Keys are raw `u64` patterns, so `-0.0` and `0.0`, or
//! NaNs with different payloads, are distinct entries.
//!
//! When a capacity is configured, stores beyond it are dropped: the result is
//! still returned to the caller, it just is not remembered. Entries are never
//! evicted or invalidated.

use crate::config::CacheConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

type Shard = RwLock<HashMap<u64, Arc<str>>>;

#[derive(Debug)]
pub struct ConversionCache {
    shards: Box<[Shard]>,
    mask: usize,
    capacity: Option<usize>,
    len: AtomicUsize,
    full_warned: AtomicBool,
}

impl ConversionCache {
    /// `config.shards` must be a power of two (checked by config validation).
    pub fn new(config: &CacheConfig) -> Self {
        assert!(config.shards.is_power_of_two(), "shard count must be a power of two");
        let shards = (0..config.shards)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            mask: config.shards - 1,
            capacity: config.capacity,
            len: AtomicUsize::new(0),
            full_warned: AtomicBool::new(false),
        }
    }

    fn shard(&self, bits: u64) -> &Shard {
        // Fibonacci hashing: low bits of typical inputs are mostly zero
        let mixed = bits.wrapping_mul(0x9e37_79b9_7f4a_7c15) >> 32;
        &self.shards[mixed as usize & self.mask]
    }

    pub fn lookup(&self, bits: u64) -> Option<Arc<str>> {
        self.shard(bits).read().get(&bits).cloned()
    }

    /// Remember `value` for `bits`. Returns false when the cache is full and
    /// the value was not stored.
    pub fn store(&self, bits: u64, value: Arc<str>) -> bool {
        let mut shard = self.shard(bits).write();
        if let Some(existing) = shard.get_mut(&bits) {
            *existing = value;
            return true;
        }
        if !self.reserve_slot() {
            if !self.full_warned.swap(true, Ordering::Relaxed) {
                warn!(
                    capacity = self.capacity.unwrap_or_default(),
                    "conversion cache is full; further results will not be cached"
                );
            }
            return false;
        }
        shard.insert(bits, value);
        true
    }

    fn reserve_slot(&self) -> bool {
        match self.capacity {
            None => {
                self.len.fetch_add(1, Ordering::Relaxed);
                true
            }
            Some(capacity) => self
                .len
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                    (n < capacity).then_some(n + 1)
                })
                .is_ok(),
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            let mut map = shard.write();
            self.len.fetch_sub(map.len(), Ordering::Relaxed);
            map.clear();
        }
        self.full_warned.store(false, Ordering::Relaxed);
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: Option<usize>, shards: usize) -> ConversionCache {
        ConversionCache::new(&CacheConfig { capacity, shards })
    }

    #[test]
    fn test_store_then_lookup() {
        let cache = ConversionCache::default();
        assert!(cache.lookup(1.5f64.to_bits()).is_none());
        assert!(cache.store(1.5f64.to_bits(), Arc::from("1.5")));
        assert_eq!(cache.lookup(1.5f64.to_bits()).as_deref(), Some("1.5"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_bit_patterns() {
        let cache = ConversionCache::default();
        cache.store(0.0f64.to_bits(), Arc::from("0"));
        assert!(cache.lookup((-0.0f64).to_bits()).is_none());
        cache.store(f64::NAN.to_bits(), Arc::from("NaN"));
        assert!(cache.lookup(f64::NAN.to_bits() | 1).is_none());
    }

    #[test]
    fn test_overwrite_does_not_grow() {
        let cache = cache(Some(2), 1);
        cache.store(7, Arc::from("a"));
        cache.store(7, Arc::from("b"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(7).as_deref(), Some("b"));
    }

    #[test]
    fn test_capacity_is_respected() {
        let cache = cache(Some(3), 4);
        for bits in 0..10u64 {
            cache.store(bits, Arc::from(bits.to_string()));
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.store(100, Arc::from("x")));
        // existing keys can still be refreshed
        assert!(cache.store(0, Arc::from("0")));
    }

    #[test]
    fn test_unbounded() {
        let cache = cache(None, 2);
        for bits in 0..5000u64 {
            assert!(cache.store(bits, Arc::from("v")));
        }
        assert_eq!(cache.len(), 5000);
        assert_eq!(cache.capacity(), None);
    }

    #[test]
    fn test_clear() {
        let cache = cache(Some(4), 2);
        for bits in 0..4u64 {
            cache.store(bits, Arc::from("v"));
        }
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.store(9, Arc::from("v")));
    }

    #[test]
    fn test_concurrent_stores_respect_capacity() {
        let cache = cache(Some(100), 8);
        std::thread::scope(|s| {
            for t in 0..4u64 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..1000u64 {
                        cache.store(t * 1000 + i, Arc::from("v"));
                    }
                });
            }
        });
        assert_eq!(cache.len(), 100);
        let stored = (0..4000u64).filter(|b| cache.lookup(*b).is_some()).count();
        assert_eq!(stored, 100);
    }
}
