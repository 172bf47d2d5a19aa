//! Concurrent collections.
//!
//! - `sharded_set`: integer-key set split over independently spin-locked buckets

pub mod sharded_set;

pub use sharded_set::{
    Bucket, BucketGuard, BucketPolicy, Fixed, HardwareScaled, ShardKey, ShardedSet,
    ShardedSetConfig,
};
