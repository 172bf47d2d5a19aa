//! A single independently locked partition of a [`ShardedSet`](super::ShardedSet).

use crate::concurrency::{SpinLock, SpinLockGuard};
use std::collections::HashSet;
use std::hash::Hash;

/// One spin lock and the keys it protects.
///
/// The local set is only reachable through a [`BucketGuard`], which exists
/// only while the bucket's lock is held, or through `&mut self`.
pub struct Bucket<K> {
    keys: SpinLock<HashSet<K>>,
}

impl<K> Bucket<K> {
    /// An empty, unlocked bucket.
    pub fn new() -> Self {
        Self {
            keys: SpinLock::new(HashSet::new()),
        }
    }

    /// Spins until this bucket's lock is held.
    #[inline]
    pub fn lock(&self) -> BucketGuard<'_, K> {
        BucketGuard {
            keys: self.keys.lock(),
        }
    }

    /// Direct access to the keys given exclusive ownership of the bucket.
    pub fn get_mut(&mut self) -> &mut HashSet<K> {
        self.keys.get_mut()
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.keys.is_locked()
    }
}

impl<K> Default for Bucket<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the keys into a bucket with a fresh, unlocked lock.
///
/// The source is locked only while its keys are copied; lock state itself is
/// never transferred.
impl<K: Clone> Clone for Bucket<K> {
    fn clone(&self) -> Self {
        let keys = self.keys.lock().clone();
        Self {
            keys: SpinLock::new(keys),
        }
    }
}

/// Exclusive access to a bucket's keys while its lock is held.
pub struct BucketGuard<'a, K> {
    keys: SpinLockGuard<'a, HashSet<K>>,
}

impl<K: Eq + Hash> BucketGuard<'_, K> {
    /// Adds `key`. Returns `true` if it was not already present.
    #[inline]
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Removes `key`. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, key: &K) -> bool {
        self.keys.remove(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Removes every key, keeping the allocation.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Number of keys in the bucket.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the bucket holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_ops_idempotent() {
        let bucket = Bucket::new();
        let mut guard = bucket.lock();
        assert!(guard.insert(3u32));
        assert!(!guard.insert(3));
        assert_eq!(guard.len(), 1);
        assert!(guard.contains(&3));
        assert!(guard.remove(&3));
        assert!(!guard.remove(&3));
        assert!(guard.is_empty());
    }

    #[test]
    fn test_guard_holds_lock() {
        let bucket: Bucket<u64> = Bucket::new();
        {
            let _guard = bucket.lock();
            assert!(bucket.is_locked());
        }
        assert!(!bucket.is_locked());
    }

    #[test]
    fn test_clear() {
        let mut bucket = Bucket::new();
        bucket.get_mut().extend([1i64, 2, 3]);
        let mut guard = bucket.lock();
        assert_eq!(guard.len(), 3);
        guard.clear();
        assert!(guard.is_empty());
    }

    #[test]
    fn test_clone_gets_fresh_lock() {
        let bucket = Bucket::new();
        bucket.lock().insert(9u16);

        let copy = bucket.clone();
        assert!(!copy.is_locked());
        assert!(!bucket.is_locked());

        // The copy keeps the keys but is otherwise independent.
        let _held = bucket.lock();
        assert!(copy.lock().contains(&9));
    }
}
