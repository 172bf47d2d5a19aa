//! Integer keys and their raw-bit routing.

use core::hash::Hash;
use num_traits::{AsPrimitive, PrimInt};

/// A fixed-width integer usable as a [`ShardedSet`](super::ShardedSet) key.
///
/// Routing uses the key's own low-order bits with no mixing step. Conversion to
/// `usize` follows `as` casts: signed keys are sign-extended, so `-1` lands in
/// the last bucket, and 128-bit keys are truncated to their low word. Keys that
/// agree in their low `log2(bucket_count)` bits always share a bucket.
pub trait ShardKey: PrimInt + Hash + AsPrimitive<usize> + Send {
    /// The key's bit pattern reinterpreted as `usize`.
    #[inline(always)]
    fn raw_bits(self) -> usize {
        self.as_()
    }
}

impl<T> ShardKey for T where T: PrimInt + Hash + AsPrimitive<usize> + Send {}
