//! Seal-rename-reopen execution.
//!
//! The whole sequence runs under the slot's exclusive guard, so concurrent
//! rotations are impossible and writers observe it as a single atomic
//! handle replacement.

use std::fs;
use std::path::PathBuf;

use rollfile_core::naming;

use crate::error::{io_err, WriterError};
use crate::handle::{ActiveFile, ActiveSlot};

/// Seal the active file, rename it to a reserved backup name, and publish a
/// fresh handle at the canonical path. Returns the backup path.
///
/// The handle stays open across the rename and follows the inode into the
/// backup name; the replacement is opened before the swap is published.
/// This relies on Unix rename-of-open-file semantics. On Windows, renaming
/// an open file fails, so every tick would surface the rename error.
///
/// Failure modes:
/// - Reservation or rename failed: nothing changed. The old handle stays
///   open under its original name, writes keep flowing, and the next tick
///   retries.
/// - Rename succeeded but the replacement open failed: the slot is parked
///   (`None`). Writes return [`WriterError::NotReady`] until a later tick
///   reopens the canonical path.
pub(crate) fn rotate(slot: &ActiveSlot) -> Result<PathBuf, WriterError> {
    let mut guard = slot.lock_exclusive();

    let (path, created_at) = match guard.as_ref() {
        Some(active) => {
            // Nothing is buffered above the File, but flush before sealing.
            active.flush().map_err(|e| io_err(active.path(), e))?;
            (active.path().to_path_buf(), active.created_at())
        }
        None => return Err(WriterError::NotReady),
    };

    let dir = path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let backup = naming::reserve_backup_path(&dir, created_at).map_err(|e| io_err(&dir, e))?;

    if let Err(err) = fs::rename(&path, &backup) {
        // Seal failed: give the reserved placeholder back and leave the old
        // handle open under its original name.
        let _ = fs::remove_file(&backup);
        return Err(io_err(&path, err));
    }

    // The old handle now points at the sealed backup. Open the replacement
    // before letting any writer proceed.
    match ActiveFile::create(&path) {
        Ok(fresh) => {
            // Dropping the previous handle closes the sealed file.
            *guard = Some(fresh);
            Ok(backup)
        }
        Err(err) => {
            *guard = None;
            Err(io_err(&path, err))
        }
    }
}

/// Reopen the canonical path for a parked slot. A no-op if a handle is
/// already published.
pub(crate) fn reopen(slot: &ActiveSlot, path: &std::path::Path) -> Result<(), WriterError> {
    let mut guard = slot.lock_exclusive();
    if guard.is_some() {
        return Ok(());
    }
    let fresh = ActiveFile::create(path).map_err(|e| io_err(path, e))?;
    *guard = Some(fresh);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
