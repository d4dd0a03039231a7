//! Memoization of operator-pair OPEs.
//!
//! Entries are keyed by the structural value of the operator pair and are
//! only valid for the registry generation they were computed under.

use log::debug;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use vertex_core::{OpeData, Operator};

/// Hit and miss counters of an [`OpeCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to be computed.
    pub misses: u64,
    /// Number of cached pairs.
    pub entries: usize,
}

impl CacheStats {
    /// Returns hits / (hits + misses), or 0 before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A cache of OPEs indexed by (left, right) operator pair.
#[derive(Default)]
pub struct OpeCache {
    entries: RwLock<FxHashMap<(Operator, Operator), Arc<OpeData>>>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl OpeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the OPE of a pair, counting the hit or miss.
    pub fn get(&self, a: &Operator, b: &Operator) -> Option<Arc<OpeData>> {
        let key = (a.clone(), b.clone());
        let found = self.entries.read().get(&key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Stores the OPE of a pair.
    pub fn insert(&self, a: Operator, b: Operator, ope: OpeData) -> Arc<OpeData> {
        let ope = Arc::new(ope);
        self.entries.write().insert((a, b), Arc::clone(&ope));
        ope
    }

    /// Returns the registry generation the entries belong to.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Drops every entry if they were computed under another generation.
    ///
    /// Returns true if the cache was invalidated.
    pub fn sync_generation(&self, generation: u64) -> bool {
        if self.generation() == generation {
            return false;
        }
        let mut entries = self.entries.write();
        debug!(
            "invalidating {} cached OPEs (generation {} -> {generation})",
            entries.len(),
            self.generation()
        );
        entries.clear();
        self.generation.store(generation, Ordering::Relaxed);
        true
    }

    /// Returns the hit and miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Returns the number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clears the entries and the counters.
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for OpeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpeCache")
            .field("generation", &self.generation())
            .field("stats", &self.stats())
            .finish()
    }
}
