//! The public writer facade.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use rollfile_core::{RotationPolicy, WriterConfig};

use crate::error::{io_err, WriterError};
use crate::handle::{ActiveFile, ActiveSlot};
use crate::rotation;
use crate::scheduler::SchedulerHandle;

type ErrorHook = Box<dyn Fn(&WriterError) + Send + Sync>;

/// State shared between the facade and the scheduler task.
pub(crate) struct Shared {
    /// Mutable until the first `start_checking`; the policy itself is fixed
    /// at construction and never rewritten.
    config: Mutex<WriterConfig>,
    slot: ActiveSlot,
    error_hook: Mutex<Option<ErrorHook>>,
}

impl Shared {
    /// One scheduler tick: recover a parked writer, otherwise consult the
    /// policy and rotate on a positive decision. Returns the backup path
    /// when a rotation happened.
    pub(crate) fn check_and_rotate(&self) -> Result<Option<PathBuf>, WriterError> {
        let (policy, active_path) = {
            let config = self.config.lock();
            (config.policy, config.active_path())
        };

        match self.slot.snapshot() {
            // Parked after a failed reopen: retry the open instead of the
            // policy check.
            None => {
                rotation::reopen(&self.slot, &active_path)?;
                tracing::info!(path = %active_path.display(), "active file reopened");
                Ok(None)
            }
            Some((created_at, path)) => {
                if policy.should_rotate(created_at, &path) {
                    rotation::rotate(&self.slot).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    pub(crate) fn report(&self, err: &WriterError) {
        if let Some(hook) = self.error_hook.lock().as_ref() {
            hook(err);
        }
    }
}

/// A byte sink backed by a rotating on-disk file.
///
/// Construct with one of the policy constructors (or [`FileWriter::new`]),
/// then call [`start_checking`](FileWriter::start_checking) to arm the
/// background rotation check. Writes are accepted from any number of
/// threads the entire time, including across rotations.
///
/// The target directory must exist before construction; the writer never
/// creates it.
pub struct FileWriter {
    shared: Arc<Shared>,
    scheduler: Mutex<Option<SchedulerHandle>>,
    ever_started: AtomicBool,
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter").finish_non_exhaustive()
    }
}

impl FileWriter {
    /// Build a writer and eagerly open the active file.
    pub fn new(config: WriterConfig) -> Result<Self, WriterError> {
        config.validate()?;
        let active_path = config.active_path();
        let active =
            ActiveFile::create(&active_path).map_err(|e| io_err(&active_path, e))?;
        Ok(Self {
            shared: Arc::new(Shared {
                config: Mutex::new(config),
                slot: ActiveSlot::new(active),
                error_hook: Mutex::new(None),
            }),
            scheduler: Mutex::new(None),
            ever_started: AtomicBool::new(false),
        })
    }

    /// Writer that rotates when the local calendar date advances.
    pub fn by_date() -> Result<Self, WriterError> {
        Self::new(WriterConfig::with_policy(RotationPolicy::ByDate))
    }

    /// Writer that rotates once the active file exceeds `threshold_bytes`.
    pub fn by_size(threshold_bytes: u64) -> Result<Self, WriterError> {
        Self::new(WriterConfig::with_policy(RotationPolicy::BySize(
            threshold_bytes,
        )))
    }

    /// Writer that rotates once the active file is older than `limit`.
    pub fn by_duration(limit: Duration) -> Result<Self, WriterError> {
        Self::new(WriterConfig::with_policy(RotationPolicy::ByDuration(limit)))
    }

    /// Append `buf` to the active file. Returns the byte count reported by
    /// the underlying write, with no internal buffering or retry.
    pub fn write_bytes(&self, buf: &[u8]) -> Result<usize, WriterError> {
        self.shared
            .slot
            .with_active(|active| active.write(buf).map_err(|e| io_err(active.path(), e)))
            .unwrap_or(Err(WriterError::NotReady))
    }

    /// Move the writer to a new directory. Reopens the active file at the
    /// new canonical path; the previous active file is left in place.
    ///
    /// Rejected once the scheduler has ever been started.
    pub fn set_directory(&self, directory: impl Into<PathBuf>) -> Result<(), WriterError> {
        self.ensure_not_started()?;
        let path = {
            let mut config = self.shared.config.lock();
            config.directory = directory.into();
            config.active_path()
        };
        self.reopen_at(&path)
    }

    /// Rename the active file's base name. Reopens at the new canonical
    /// path; the previous active file is left in place.
    ///
    /// Rejected once the scheduler has ever been started.
    pub fn set_base_name(&self, base_name: impl Into<String>) -> Result<(), WriterError> {
        self.ensure_not_started()?;
        let path = {
            let mut config = self.shared.config.lock();
            config.base_name = base_name.into();
            config.validate()?;
            config.active_path()
        };
        self.reopen_at(&path)
    }

    /// Change how often the policy is evaluated.
    ///
    /// Rejected once the scheduler has ever been started.
    pub fn set_check_interval(&self, interval: Duration) -> Result<(), WriterError> {
        self.ensure_not_started()?;
        let mut config = self.shared.config.lock();
        let previous = config.check_interval;
        config.check_interval = interval;
        if let Err(err) = config.validate() {
            config.check_interval = previous;
            return Err(err.into());
        }
        Ok(())
    }

    /// Register a callback invoked with every rotation error the scheduler
    /// encounters. Errors are logged via `tracing` regardless.
    pub fn set_error_hook(&self, hook: impl Fn(&WriterError) + Send + Sync + 'static) {
        *self.shared.error_hook.lock() = Some(Box::new(hook));
    }

    /// Arm the background rotation check. Must be called inside a tokio
    /// runtime. From the first start onward, configuration setters are
    /// rejected — even after a stop.
    pub fn start_checking(&self) -> Result<(), WriterError> {
        let mut scheduler = self.scheduler.lock();
        if scheduler.is_some() {
            return Err(WriterError::AlreadyStarted);
        }
        let interval = self.shared.config.lock().check_interval;
        self.ever_started.store(true, Ordering::SeqCst);
        *scheduler = Some(SchedulerHandle::spawn(Arc::clone(&self.shared), interval));
        Ok(())
    }

    /// Stop the background check and wait for the task to wind down.
    /// Idempotent; an in-flight rotation finishes first. Writes keep
    /// working against the current handle afterwards.
    pub async fn stop_checking(&self) {
        let handle = self.scheduler.lock().take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    /// Path of the active file under the current configuration.
    pub fn active_path(&self) -> PathBuf {
        self.shared.config.lock().active_path()
    }

    fn ensure_not_started(&self) -> Result<(), WriterError> {
        if self.ever_started.load(Ordering::SeqCst) {
            return Err(WriterError::AlreadyStarted);
        }
        Ok(())
    }

    fn reopen_at(&self, path: &Path) -> Result<(), WriterError> {
        let fresh = ActiveFile::create(path).map_err(|e| io_err(path, e))?;
        *self.shared.slot.lock_exclusive() = Some(fresh);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn park_for_test(&self) {
        *self.shared.slot.lock_exclusive() = None;
    }

    #[cfg(test)]
    pub(crate) fn shared_for_test(&self) -> &Shared {
        &self.shared
    }
}

impl io::Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf).map_err(into_io_error)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.shared
            .slot
            .with_active(|active| active.flush())
            .unwrap_or_else(|| Err(into_io_error(WriterError::NotReady)))
    }
}

impl io::Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut &*self)
    }
}

fn into_io_error(err: WriterError) -> io::Error {
    match err {
        WriterError::Io { source, .. } => source,
        WriterError::NotReady => io::Error::new(io::ErrorKind::NotConnected, err.to_string()),
        other => io::Error::other(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
