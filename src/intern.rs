//! Position identity and repetition tracking.
//!
//! A [`PositionKey`] is a canonical digest of board contents plus side to
//! move: two positions that look identical compare and hash equal, no
//! matter which game object produced them.
//!
//! Keys seen during a game are interned in a pool shared by every snapshot
//! of that game. Snapshots hold `Arc` handles to the keys they have
//! counted, so a key stays resident exactly as long as some live snapshot
//! references it. Forking a snapshot sweeps the pool first, dropping keys
//! whose only remaining reference is the pool's own entry — this keeps the
//! pool bounded when a search tree forks and discards thousands of
//! snapshots.
//!
//! The pool itself is behind a mutex so concurrent drivers may deep-copy
//! game objects per thread while sharing one pool; all other repetition
//! state is owned per snapshot.

use std::sync::{Arc, Mutex};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::PlayerId;

/// Canonical, order-independent digest of a position.
///
/// `cells` is a game-defined byte serialization of the full board
/// contents. Equality and hashing are purely structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    cells: Vec<u8>,
    to_move: u8,
}

impl PositionKey {
    /// Create a key from serialized board contents and the side to move.
    #[must_use]
    pub fn new(cells: Vec<u8>, to_move: PlayerId) -> Self {
        Self {
            cells,
            to_move: to_move.0,
        }
    }

    /// The side to move this key was taken for.
    #[must_use]
    pub fn to_move(&self) -> PlayerId {
        PlayerId::new(self.to_move)
    }
}

/// Shared pool of interned position keys.
///
/// Cloning the pool clones a handle to the same underlying set.
#[derive(Clone, Debug, Default)]
pub struct InternPool {
    inner: Arc<Mutex<FxHashSet<Arc<PositionKey>>>>,
}

impl InternPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical handle for `key`, inserting it if unseen.
    #[must_use]
    pub fn intern(&self, key: PositionKey) -> Arc<PositionKey> {
        let mut set = self.inner.lock().expect("intern pool poisoned");
        let candidate = Arc::new(key);
        if let Some(existing) = set.get(&candidate) {
            Arc::clone(existing)
        } else {
            set.insert(Arc::clone(&candidate));
            candidate
        }
    }

    /// Drop every key whose only remaining reference is the pool's own
    /// entry, i.e. no live snapshot counts it any more.
    pub fn prune(&self) {
        let mut set = self.inner.lock().expect("intern pool poisoned");
        set.retain(|key| Arc::strong_count(key) > 1);
    }

    /// Number of currently interned keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("intern pool poisoned").len()
    }

    /// Check if the pool holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-snapshot repetition state over a shared [`InternPool`].
#[derive(Clone, Debug)]
pub struct RepetitionTracker {
    pool: InternPool,
    counts: FxHashMap<Arc<PositionKey>, u8>,
    current: u8,
}

impl RepetitionTracker {
    /// Create a tracker over the given pool. No position is recorded yet.
    #[must_use]
    pub fn new(pool: InternPool) -> Self {
        Self {
            pool,
            counts: FxHashMap::default(),
            current: 0,
        }
    }

    /// Record that `key` is now the current position, returning how many
    /// times it has occurred in this snapshot's line of play.
    pub fn record(&mut self, key: PositionKey) -> u8 {
        let handle = self.pool.intern(key);
        let count = self.counts.entry(handle).or_insert(0);
        *count = count.saturating_add(1);
        self.current = *count;
        self.current
    }

    /// Occurrence count of the current position.
    #[must_use]
    pub fn current_count(&self) -> u8 {
        self.current
    }

    /// Occurrence count of an arbitrary key in this snapshot's line.
    #[must_use]
    pub fn count_of(&self, key: &PositionKey) -> u8 {
        self.counts
            .iter()
            .find(|(handle, _)| handle.as_ref() == key)
            .map_or(0, |(_, &count)| count)
    }

    /// The shared pool this tracker records into.
    #[must_use]
    pub fn pool(&self) -> &InternPool {
        &self.pool
    }

    /// Derive a tracker for a forked snapshot.
    ///
    /// Sweeps the shared pool before anything else, so keys kept alive
    /// only by already-discarded snapshots are reclaimed at every fork.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.pool.prune();
        self.clone()
    }

    /// Drop per-snapshot counts, releasing this snapshot's hold on every
    /// interned key. The current-position count is retained. Used when a
    /// snapshot is reduced to a cache key.
    pub fn minimize(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tag: u8, to_move: u8) -> PositionKey {
        PositionKey::new(vec![tag; 4], PlayerId::new(to_move))
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(key(1, 0), key(1, 0));
        assert_ne!(key(1, 0), key(2, 0));
        assert_ne!(key(1, 0), key(1, 1));
    }

    #[test]
    fn test_intern_dedupes() {
        let pool = InternPool::new();
        let a = pool.intern(key(1, 0));
        let b = pool.intern(key(1, 0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_prune_drops_unreferenced() {
        let pool = InternPool::new();
        let keep = pool.intern(key(1, 0));
        {
            let _dropped = pool.intern(key(2, 0));
        }
        assert_eq!(pool.len(), 2);
        pool.prune();
        assert_eq!(pool.len(), 1);
        drop(keep);
        pool.prune();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_record_counts_occurrences() {
        let mut tracker = RepetitionTracker::new(InternPool::new());
        assert_eq!(tracker.record(key(1, 0)), 1);
        assert_eq!(tracker.record(key(2, 1)), 1);
        assert_eq!(tracker.record(key(1, 0)), 2);
        assert_eq!(tracker.current_count(), 2);
        assert_eq!(tracker.count_of(&key(2, 1)), 1);
        assert_eq!(tracker.count_of(&key(3, 0)), 0);
    }

    #[test]
    fn test_fork_prunes_discarded_lines() {
        let mut root = RepetitionTracker::new(InternPool::new());
        root.record(key(0, 0));

        // A discarded branch leaves its keys behind until the next fork.
        {
            let mut branch = root.fork();
            branch.record(key(7, 0));
            branch.record(key(8, 1));
        }
        assert_eq!(root.pool().len(), 3);

        let fork = root.fork();
        assert_eq!(root.pool().len(), 1);
        assert_eq!(fork.count_of(&key(0, 0)), 1);
    }

    #[test]
    fn test_minimize_releases_keys() {
        let pool = InternPool::new();
        let mut tracker = RepetitionTracker::new(pool.clone());
        tracker.record(key(1, 0));
        tracker.record(key(2, 0));
        assert_eq!(tracker.current_count(), 1);

        tracker.minimize();
        pool.prune();
        assert!(pool.is_empty());
        // Current-position count survives minimization.
        assert_eq!(tracker.current_count(), 1);
    }

    #[test]
    fn test_pool_bounded_under_fork_discard() {
        let mut root = RepetitionTracker::new(InternPool::new());
        root.record(key(0, 0));
        for round in 0..100u8 {
            let mut branch = root.fork();
            branch.record(key(round.wrapping_add(1), 0));
            branch.record(key(round.wrapping_add(2), 1));
            // branch dropped here; its exclusive keys die on the next fork
        }
        root.pool().prune();
        assert_eq!(root.pool().len(), 1);
    }
}
