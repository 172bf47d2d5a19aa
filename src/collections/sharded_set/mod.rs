//! `ShardedSet` — a concurrent set of integer keys with per-bucket spin locks.
//!
//! The key space is split over a fixed, power-of-two number of buckets. A key's
//! bucket is `raw_bits(key) & (bucket_count - 1)`: no hashing, no division.
//! Every point operation takes exactly one bucket lock for a few hash-set
//! operations and releases it before returning, so there is no lock ordering
//! to get wrong and no deadlock between point operations.
//!
//! Whole-set scans ([`clear`](ShardedSet::clear),
//! [`approximate_size`](ShardedSet::approximate_size)) walk the buckets in
//! index order holding one lock at a time. They are not atomic: concurrent
//! writers may be observed on some buckets and not others.
//!
//! Buckets are allocated once and never move. There is no resizing; build a
//! new set with a different bucket count if the load changes.
//!
//! ```rust
//! use velocity::ShardedSet;
//!
//! let set = ShardedSet::with_bucket_count(64).unwrap();
//! set.insert(42u64);
//! assert!(set.contains(&42));
//! set.remove(&42);
//! assert!(!set.contains(&42));
//! assert_eq!(set.bucket_count(), 64);
//! ```

pub mod bucket;
pub mod config;
pub mod key;
pub mod policy;

pub use bucket::{Bucket, BucketGuard};
pub use config::ShardedSetConfig;
pub use key::ShardKey;
pub use policy::{BucketPolicy, Fixed, HardwareScaled};

use core::fmt;
use core::mem;

use crate::concurrency::CachePadded;
use crate::error::ConfigError;
use policy::is_power_of_two;

/// A concurrent set of fixed-width integer keys.
///
/// `ShardedSet<K>` is `Send + Sync`; share it by reference or `Arc` and call
/// every operation through `&self`.
pub struct ShardedSet<K> {
    buckets: Box<[CachePadded<Bucket<K>>]>,
    mask: usize,
}

impl<K: ShardKey> ShardedSet<K> {
    /// Creates a set sized by [`HardwareScaled`].
    pub fn new() -> Self {
        Self::allocate(HardwareScaled::new().bucket_count())
    }

    /// Creates a set with `bucket_count` buckets, or an auto-sized one for `0`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidConfiguration`] if `bucket_count` is non-zero and
    /// not a power of two, or too large to allocate.
    pub fn with_bucket_count(bucket_count: usize) -> Result<Self, ConfigError> {
        Self::from_config(&ShardedSetConfig::new().with_bucket_count(bucket_count))
    }

    /// Creates a set sized by `policy`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidConfiguration`] if the policy proposes zero, a
    /// count that is not a power of two, or one too large to allocate.
    pub fn with_policy(policy: &impl BucketPolicy) -> Result<Self, ConfigError> {
        let requested = policy.bucket_count();
        if is_power_of_two(requested) {
            Self::checked_allocate(requested)
        } else {
            Err(ConfigError::InvalidConfiguration { requested })
        }
    }

    /// Creates a set from serialized settings.
    ///
    /// # Errors
    /// See [`ShardedSetConfig::validate`]. Also rejects counts whose bucket
    /// array would exceed `isize::MAX` bytes.
    pub fn from_config(config: &ShardedSetConfig) -> Result<Self, ConfigError> {
        Self::checked_allocate(config.validate()?)
    }

    /// Largest bucket count whose array fits in an allocation.
    fn max_bucket_count() -> usize {
        isize::MAX.unsigned_abs() / mem::size_of::<CachePadded<Bucket<K>>>()
    }

    fn checked_allocate(bucket_count: usize) -> Result<Self, ConfigError> {
        if bucket_count > Self::max_bucket_count() {
            return Err(ConfigError::InvalidConfiguration {
                requested: bucket_count,
            });
        }
        Ok(Self::allocate(bucket_count))
    }

    fn allocate(bucket_count: usize) -> Self {
        debug_assert!(is_power_of_two(bucket_count));

        #[cfg(feature = "tracing")]
        tracing::debug!(bucket_count, "allocating sharded set");

        // Collected straight into a boxed slice: buckets are placed once and
        // never reallocated afterwards.
        let buckets = (0..bucket_count)
            .map(|_| CachePadded::new(Bucket::new()))
            .collect::<Box<[_]>>();
        Self {
            buckets,
            mask: bucket_count - 1,
        }
    }

    /// Bucket that owns `key`. Pure function of the key's low bits.
    #[inline(always)]
    pub fn bucket_index(&self, key: &K) -> usize {
        key.raw_bits() & self.mask
    }

    #[inline(always)]
    fn bucket(&self, key: &K) -> &Bucket<K> {
        &self.buckets[self.bucket_index(key)]
    }

    /// Adds `key` to the set. Idempotent.
    #[inline]
    pub fn insert(&self, key: K) {
        self.bucket(&key).lock().insert(key);
    }

    /// Removes `key` from the set. No-op if absent.
    #[inline]
    pub fn remove(&self, key: &K) {
        self.bucket(key).lock().remove(key);
    }

    /// Returns `true` if `key` is a member.
    ///
    /// Takes the bucket lock like any writer: the local set cannot be read
    /// while another thread mutates it.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.bucket(key).lock().contains(key)
    }

    /// Empties every bucket, one lock at a time in index order.
    ///
    /// Not atomic across buckets. A concurrent operation on a bucket that has
    /// not been reached yet sees pre-clear state.
    pub fn clear(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(bucket_count = self.bucket_count(), "clearing sharded set");

        for bucket in self.buckets.iter() {
            bucket.lock().clear();
        }
    }

    /// Sum of per-bucket sizes, each read under its own lock.
    ///
    /// Exact when no other thread is mutating the set; otherwise an estimate,
    /// since buckets are counted at different instants.
    pub fn approximate_size(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.lock().len()).sum()
    }

    /// Returns `true` if every bucket was empty when visited.
    ///
    /// Same caveat as [`approximate_size`](Self::approximate_size).
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.lock().is_empty())
    }

    /// The fixed, power-of-two number of buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl<K: ShardKey> Default for ShardedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ShardKey> Extend<K> for ShardedSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        // Exclusive access: fill buckets without touching their locks.
        for key in iter {
            let index = self.bucket_index(&key);
            self.buckets[index].get_mut().insert(key);
        }
    }
}

impl<'a, K: ShardKey> Extend<&'a K> for ShardedSet<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K: ShardKey> FromIterator<K> for ShardedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Copies bucket by bucket. Each new bucket gets a fresh lock; the copy is not
/// a consistent snapshot if the source is being mutated.
impl<K: ShardKey> Clone for ShardedSet<K> {
    fn clone(&self) -> Self {
        let buckets = self
            .buckets
            .iter()
            .map(|bucket| CachePadded::new(Bucket::clone(bucket)))
            .collect::<Box<[_]>>();
        Self {
            buckets,
            mask: self.mask,
        }
    }
}

impl<K: ShardKey> fmt::Debug for ShardedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedSet")
            .field("bucket_count", &self.bucket_count())
            .field("approximate_size", &self.approximate_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_matches_bucket_count() {
        let set = ShardedSet::<u32>::with_bucket_count(16).unwrap();
        assert_eq!(set.mask, 15);
        assert_eq!(set.bucket_index(&17), 1);
        assert_eq!(set.bucket_index(&u32::MAX), 15);
    }

    #[test]
    fn test_negative_keys_route_by_bit_pattern() {
        let set = ShardedSet::<i32>::with_bucket_count(8).unwrap();
        assert_eq!(set.bucket_index(&-1), 7);
        assert_eq!(set.bucket_index(&-8), 0);
        set.insert(-1);
        assert!(set.contains(&-1));
        assert!(!set.contains(&7));
    }

    #[test]
    fn test_zero_means_auto() {
        let set = ShardedSet::<u64>::with_bucket_count(0).unwrap();
        assert!(set.bucket_count() >= HardwareScaled::DEFAULT_FLOOR);
        assert!(is_power_of_two(set.bucket_count()));
        assert_eq!(set.bucket_count(), ShardedSet::<u64>::new().bucket_count());
    }

    #[test]
    fn test_with_policy() {
        assert_eq!(ShardedSet::<u8>::with_policy(&Fixed(32)).unwrap().bucket_count(), 32);
        assert!(ShardedSet::<u8>::with_policy(&Fixed(0)).is_err());
        assert!(ShardedSet::<u8>::with_policy(&Fixed(48)).is_err());
        let scaled = HardwareScaled { per_thread: 1, floor: 4 };
        assert!(ShardedSet::<u8>::with_policy(&scaled).is_ok());
    }

    #[test]
    fn test_oversized_counts_rejected_not_allocated() {
        let top = 1usize << (usize::BITS - 1);
        let greedy = HardwareScaled { per_thread: usize::MAX, floor: top };
        assert_eq!(greedy.bucket_count(), top);
        assert_eq!(
            ShardedSet::<u64>::with_policy(&greedy).unwrap_err(),
            ConfigError::InvalidConfiguration { requested: top }
        );
        assert!(ShardedSet::<u64>::with_policy(&Fixed(top)).is_err());
        assert!(ShardedSet::<u64>::with_bucket_count(top).is_err());
        assert!(ShardedSet::<u8>::with_policy(&Fixed(1 << 10)).is_ok());
    }

    #[test]
    fn test_buckets_are_cache_padded() {
        // 32 on the narrowest targets crossbeam knows about, 128 on x86_64.
        assert!(core::mem::align_of::<CachePadded<Bucket<u64>>>() >= 32);
        let size = core::mem::size_of::<CachePadded<Bucket<u64>>>();
        assert_eq!(size % core::mem::align_of::<CachePadded<Bucket<u64>>>(), 0);
    }

    #[test]
    fn test_extend_skips_locks() {
        let mut set = ShardedSet::<u16>::with_bucket_count(4).unwrap();
        set.extend([1, 2, 3, 5, 1]);
        set.extend(&[8u16]);
        assert_eq!(set.approximate_size(), 5);
        assert!(set.buckets.iter().all(|b| !b.is_locked()));
    }

    #[test]
    fn test_clone_is_independent() {
        let set: ShardedSet<i64> = (0..100).collect();
        let copy = set.clone();
        set.clear();
        assert_eq!(copy.approximate_size(), 100);
        assert_eq!(copy.bucket_count(), set.bucket_count());
        assert!(set.is_empty());
    }

    #[test]
    fn test_debug_does_not_list_keys() {
        let set = ShardedSet::<u8>::with_bucket_count(2).unwrap();
        set.insert(200);
        let s = format!("{set:?}");
        assert!(s.contains("bucket_count: 2"));
        assert!(s.contains("approximate_size: 1"));
        assert!(!s.contains("200"));
    }
}
