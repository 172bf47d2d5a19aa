//! Concurrency building blocks used by the sharded collections.
//!
//! Everything here is tuned for short critical sections on OS threads. Nothing
//! parks; contended waiters spin with a relax hint.

pub mod sync;

pub use crossbeam_utils::CachePadded;
pub use sync::{RawSpinLock, SpinLock, SpinLockGuard};
