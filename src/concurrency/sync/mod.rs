//! Locking primitives.

pub mod spin_lock;

pub use spin_lock::{RawSpinLock, SpinLock, SpinLockGuard};
