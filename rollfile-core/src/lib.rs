//! # rollfile-core
//!
//! Decision logic for the rotating file writer:
//! - [`policy`] — when to seal the active file ([`RotationPolicy`])
//! - [`naming`] — what to call the sealed copy
//! - [`config`] — what a writer is built from ([`WriterConfig`])
//! - [`error`] — [`ConfigError`]
//!
//! All filesystem mutation beyond backup-name reservation lives in
//! `rollfile-writer`.

pub mod config;
pub mod error;
pub mod naming;
pub mod policy;

pub use config::{
    WriterConfig, DEFAULT_BASE_NAME, DEFAULT_CHECK_INTERVAL, DEFAULT_DIRECTORY,
};
pub use error::ConfigError;
pub use policy::RotationPolicy;
