//! Serializable construction settings.

use super::policy::{is_power_of_two, BucketPolicy, HardwareScaled};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Settings for building a [`ShardedSet`](super::ShardedSet).
///
/// A `bucket_count` of `0` means "auto" and defers to [`HardwareScaled`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardedSetConfig {
    /// Requested number of buckets, or `0` for auto.
    pub bucket_count: usize,
}

impl ShardedSetConfig {
    /// An auto-sized configuration.
    pub const fn new() -> Self {
        Self { bucket_count: 0 }
    }

    /// Sets the requested bucket count.
    #[must_use]
    pub const fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Resolves the effective bucket count.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidConfiguration`] if a non-zero count that
    /// is not a power of two was requested.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        resolve(self.bucket_count, &HardwareScaled::new())
    }
}

/// `0` goes to `auto`; anything else must already be a power of two.
fn resolve(requested: usize, auto: &impl BucketPolicy) -> Result<usize, ConfigError> {
    let count = if requested == 0 { auto.bucket_count() } else { requested };
    if is_power_of_two(count) {
        Ok(count)
    } else {
        Err(ConfigError::InvalidConfiguration { requested: count })
    }
}
