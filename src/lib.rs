//! # `velocity` - Sharded Concurrent Integer Set
//!
//! A thread-safe set for fixed-width integer keys built for fast membership
//! tests, insertion and removal under heavy multi-threaded load.
//!
//! ## Design
//!
//! - **Fixed sharding**: the set owns a power-of-two number of buckets chosen
//!   at construction and never resized.
//! - **Mask routing**: a key's bucket is its raw low-order bits AND
//!   `bucket_count - 1`. There is no mixing hash, so keys that share their low
//!   bits (for example every multiple of `bucket_count`) share one bucket and
//!   one lock.
//! - **Spin locks**: each bucket is guarded by a [`SpinLock`] that busy-waits
//!   with a CPU relax hint instead of parking. Critical sections are a single
//!   hash-set operation, so waits are short.
//! - **Cache padding**: every bucket sits on its own cache line to avoid false
//!   sharing between threads hitting neighbouring buckets.
//!
//! ## Concurrency Guarantees
//!
//! - Operations on one key are totally ordered by that key's bucket lock.
//! - Operations on keys in different buckets run in parallel.
//! - No operation ever holds two bucket locks, so there is no deadlock between
//!   set operations.
//! - `clear` and `approximate_size` visit buckets one at a time and are not
//!   atomic with respect to concurrent writers.
//!
//! ## Feature Flags
//!
//! - `tracing`: emit `tracing` events on construction, clearing and contended
//!   lock acquisition.
//!
//! ## Example
//!
//! ```rust
//! use std::thread;
//! use velocity::ShardedSet;
//!
//! let set = ShardedSet::<u64>::new();
//!
//! thread::scope(|s| {
//!     for t in 0..4u64 {
//!         let set = &set;
//!         s.spawn(move || {
//!             for k in t * 1000..(t + 1) * 1000 {
//!                 set.insert(k);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(set.approximate_size(), 4000);
//! assert!(set.contains(&3999));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod collections;
pub mod concurrency;
pub mod error;

pub use collections::{BucketPolicy, HardwareScaled, ShardKey, ShardedSet, ShardedSetConfig};
pub use concurrency::{RawSpinLock, SpinLock, SpinLockGuard};
pub use error::ConfigError;

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // The lock is a single flag byte.
    assert!(mem::size_of::<RawSpinLock>() == 1);
    assert!(mem::size_of::<SpinLock<()>>() == 1);
};
