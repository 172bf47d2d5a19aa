//! Error types.

/// Construction-time configuration error.
///
/// This is the only error a [`ShardedSet`](crate::ShardedSet) reports. Every
/// operation on a constructed set is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The bucket count is not a power of two, or its bucket array would not
    /// fit in a single allocation.
    InvalidConfiguration {
        /// The rejected bucket count.
        requested: usize,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidConfiguration { requested } => {
                write!(
                    f,
                    "invalid configuration: bucket count {requested} is not a usable power of two"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
