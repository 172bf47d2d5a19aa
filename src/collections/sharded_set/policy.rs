//! Bucket-count sizing policies.
//!
//! Sizing is ordinary configuration, kept apart from the locking path. A
//! policy only proposes a count; [`ShardedSet`](super::ShardedSet) still
//! rejects anything that is not a non-zero power of two.

use std::num::NonZeroUsize;
use std::thread;

/// Chooses the number of buckets for a new set.
pub trait BucketPolicy {
    /// The proposed bucket count.
    fn bucket_count(&self) -> usize;
}

/// Scales the bucket count with the machine's hardware thread count.
///
/// `max(floor, next_power_of_two(threads * per_thread))`, where `threads`
/// comes from [`std::thread::available_parallelism`]. When the thread count
/// cannot be detected the floor (rounded up to a power of two) is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareScaled {
    /// Buckets per hardware thread.
    pub per_thread: usize,
    /// Lower bound on the bucket count.
    pub floor: usize,
}

impl HardwareScaled {
    /// Buckets allotted per hardware thread by default.
    pub const DEFAULT_PER_THREAD: usize = 16;
    /// Smallest default bucket count.
    pub const DEFAULT_FLOOR: usize = 128;

    /// Creates the policy with the default factors.
    pub const fn new() -> Self {
        Self {
            per_thread: Self::DEFAULT_PER_THREAD,
            floor: Self::DEFAULT_FLOOR,
        }
    }

    /// Applies the formula to an explicit thread count.
    pub fn for_threads(&self, threads: usize) -> usize {
        let desired = next_power_of_two(threads.saturating_mul(self.per_thread));
        desired.max(next_power_of_two(self.floor))
    }
}

impl Default for HardwareScaled {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketPolicy for HardwareScaled {
    fn bucket_count(&self) -> usize {
        match thread::available_parallelism().map(NonZeroUsize::get) {
            Ok(threads) => self.for_threads(threads),
            Err(_) => next_power_of_two(self.floor),
        }
    }
}

/// A caller-chosen bucket count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub usize);

impl BucketPolicy for Fixed {
    fn bucket_count(&self) -> usize {
        self.0
    }
}

/// Returns `true` if `n` is a power of two. Zero is not.
#[inline]
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Smallest power of two `>= n`, with `1` for `0`.
///
/// Saturates at the largest representable power of two instead of wrapping.
#[inline]
pub const fn next_power_of_two(n: usize) -> usize {
    match n.checked_next_power_of_two() {
        Some(p) => p,
        None => 1 << (usize::BITS - 1),
    }
}
