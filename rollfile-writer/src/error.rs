//! Error types for rollfile-writer.

use std::path::PathBuf;

use thiserror::Error;

use rollfile_core::ConfigError;

/// Error surface for the writer facade, rotation, and scheduler.
#[derive(Debug, Error)]
pub enum WriterError {
    /// No active handle is open. Writes are refused until a scheduler tick
    /// (or a config setter) reopens the active file.
    #[error("writer not ready: no active file is open")]
    NotReady,

    /// Rejected policy or writer configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error, with the offending path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scheduler has already been started; configuration is frozen and
    /// a second concurrent start is refused.
    #[error("scheduler already started")]
    AlreadyStarted,
}

/// Convenience constructor for [`WriterError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WriterError {
    WriterError::Io {
        path: path.into(),
        source,
    }
}
