//! # rollfile-writer
//!
//! A byte sink that appends to an active on-disk file while a background
//! task periodically decides, per a [`RotationPolicy`], whether to seal the
//! file, rename it to a uniquely named backup, and open a fresh one — all
//! while remaining a valid write target for concurrent callers.
//!
//! ```no_run
//! use rollfile_writer::FileWriter;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), rollfile_writer::WriterError> {
//! let writer = FileWriter::by_size(10 * 1024 * 1024)?;
//! writer.start_checking()?;
//! writer.write_bytes(b"hello\n")?;
//! writer.stop_checking().await;
//! # Ok(())
//! # }
//! ```
//!
//! Every byte accepted before a rotation's handle swap lands in exactly one
//! file: the sealed backup or the fresh active file, never both, never
//! neither. Rotation errors are logged and, if registered, handed to the
//! writer's error hook; they never terminate the hosting process.

mod error;
mod handle;
mod rotation;
mod scheduler;
mod writer;

pub use error::WriterError;
pub use rollfile_core::{ConfigError, RotationPolicy, WriterConfig};
pub use writer::FileWriter;
