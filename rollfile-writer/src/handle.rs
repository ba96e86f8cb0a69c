//! The active file handle and its swap discipline.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use parking_lot::{RwLock, RwLockWriteGuard};

/// The currently open file, its canonical path, and when it was opened.
///
/// Never mutated in place: rotation replaces the whole value through
/// [`ActiveSlot`].
pub(crate) struct ActiveFile {
    file: File,
    path: PathBuf,
    created_at: DateTime<Local>,
}

impl ActiveFile {
    /// Create (truncating) the file at `path`. The creation timestamp is
    /// taken at the moment the open succeeds.
    pub(crate) fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            created_at: Local::now(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Write through a shared reference (`&File` implements `Write`).
    pub(crate) fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (&self.file).write(buf)
    }

    pub(crate) fn flush(&self) -> io::Result<()> {
        (&self.file).flush()
    }
}

/// Reader/writer-locked slot holding the current handle.
///
/// `write` holds a read guard exactly for "fetch handle, issue write": any
/// number of writers proceed in parallel, and a handle a write started
/// against stays open and un-renamed until that write returns. Rotation
/// holds the write guard across seal-rename-reopen-publish, so every writer
/// sees either the fully-old or the fully-new handle. `None` means the
/// writer is parked after a failed reopen.
pub(crate) struct ActiveSlot {
    inner: RwLock<Option<ActiveFile>>,
}

impl ActiveSlot {
    pub(crate) fn new(active: ActiveFile) -> Self {
        Self {
            inner: RwLock::new(Some(active)),
        }
    }

    /// Run `f` against the current handle under a read guard.
    pub(crate) fn with_active<T>(
        &self,
        f: impl FnOnce(&ActiveFile) -> T,
    ) -> Option<T> {
        self.inner.read().as_ref().map(f)
    }

    /// Exclusive access for rotation and reopen.
    pub(crate) fn lock_exclusive(&self) -> RwLockWriteGuard<'_, Option<ActiveFile>> {
        self.inner.write()
    }

    /// Creation time and path of the current handle, or `None` if parked.
    pub(crate) fn snapshot(&self) -> Option<(DateTime<Local>, PathBuf)> {
        self.inner
            .read()
            .as_ref()
            .map(|active| (active.created_at(), active.path().to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn create_truncates_a_stale_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("default.log");
        fs::write(&path, "stale content").unwrap();

        let active = ActiveFile::create(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        assert_eq!(active.path(), path.as_path());
    }

    #[test]
    fn writes_through_a_shared_reference_append_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("default.log");
        let active = ActiveFile::create(&path).unwrap();

        assert_eq!(active.write(b"one ").unwrap(), 4);
        assert_eq!(active.write(b"two").unwrap(), 3);
        active.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one two");
    }

    #[test]
    fn snapshot_reflects_the_published_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("default.log");
        let slot = ActiveSlot::new(ActiveFile::create(&path).unwrap());

        let (created_at, seen) = slot.snapshot().unwrap();
        assert_eq!(seen, path);
        assert!(created_at <= Local::now());

        *slot.lock_exclusive() = None;
        assert!(slot.snapshot().is_none());
        assert!(slot.with_active(|_| ()).is_none());
    }
}
