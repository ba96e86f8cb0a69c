//! Error types for rollfile-core.

use thiserror::Error;

/// Configuration rejected before the writer is built or started.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A size policy with a zero threshold would rotate on every tick.
    #[error("size threshold must be greater than zero bytes")]
    ZeroSizeThreshold,

    /// A duration policy with a zero threshold would rotate on every tick.
    #[error("duration threshold must be greater than zero")]
    ZeroDurationThreshold,

    /// The scheduler cannot wake on a zero interval.
    #[error("check interval must be greater than zero")]
    ZeroCheckInterval,

    /// The active file needs a name.
    #[error("base name must not be empty")]
    EmptyBaseName,
}
