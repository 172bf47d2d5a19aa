//! Minimal busy-waiting mutual exclusion for short critical sections.
//!
//! Waiters never park: they poll the flag with a CPU relax hint between
//! attempts. There is no fairness and no reentrancy. Acquiring a lock twice
//! on one thread deadlocks.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

/// A bare spin lock flag with no protected data.
///
/// `acquire` is an Acquire barrier and `release` a Release barrier, so every
/// write made while holding the lock is visible to the next holder.
pub struct RawSpinLock {
    locked: AtomicBool,
}

impl RawSpinLock {
    const UNLOCKED: bool = false;
    const LOCKED: bool = true;

    /// Creates an unlocked lock.
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(Self::UNLOCKED),
        }
    }

    /// Spins until the calling thread holds the lock.
    #[inline]
    pub fn acquire(&self) {
        if self.try_acquire_weak() {
            return;
        }
        self.acquire_slow();
    }

    #[cold]
    fn acquire_slow(&self) {
        #[cfg(feature = "tracing")]
        tracing::trace!("spin lock contended");

        loop {
            // Poll with plain loads so waiters share the cache line instead
            // of bouncing it with failed read-modify-writes.
            while self.locked.load(Ordering::Relaxed) == Self::LOCKED {
                std::hint::spin_loop();
            }
            if self.try_acquire_weak() {
                return;
            }
            std::hint::spin_loop();
        }
    }

    #[inline]
    fn try_acquire_weak(&self) -> bool {
        self.locked
            .compare_exchange_weak(
                Self::UNLOCKED,
                Self::LOCKED,
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    /// Makes a single attempt to take the lock.
    #[inline]
    pub fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(
                Self::UNLOCKED,
                Self::LOCKED,
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    /// Releases the lock.
    ///
    /// # Safety
    /// The calling thread must currently hold the lock.
    #[inline]
    pub unsafe fn release(&self) {
        self.locked.store(Self::UNLOCKED, Ordering::Release);
    }

    /// Returns whether some thread holds the lock right now.
    ///
    /// The answer may be stale by the time it is read.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

/// A spin lock protecting a value of type `T`.
pub struct SpinLock<T> {
    raw: RawSpinLock,
    value: UnsafeCell<T>,
}

// Safety: access to `value` is serialized through `raw`.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates an unlocked spin lock holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            raw: RawSpinLock::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Spins until the lock is held and returns a guard that releases it on drop.
    #[inline]
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        self.raw.acquire();
        SpinLockGuard::new(self)
    }

    /// Returns a guard if the lock was free.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        if self.raw.try_acquire() {
            Some(SpinLockGuard::new(self))
        } else {
            None
        }
    }

    /// Mutable access through an exclusive borrow; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the lock and returns the protected value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// See [`RawSpinLock::is_locked`].
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// RAII guard for [`SpinLock`]. The lock is held for the guard's lifetime.
///
/// The guard is `Sync` only when `T: Sync`, since a shared `&guard` hands out
/// `&T` to every thread holding it:
///
/// ```compile_fail
/// use std::cell::Cell;
/// use velocity::SpinLockGuard;
///
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<SpinLockGuard<'static, Cell<u64>>>();
/// ```
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> SpinLockGuard<'a, T> {
    fn new(lock: &'a SpinLock<T>) -> Self {
        Self {
            lock,
            _marker: PhantomData,
        }
    }
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        // Safety: the guard only exists while the lock is held.
        unsafe { self.lock.raw.release() };
    }
}
