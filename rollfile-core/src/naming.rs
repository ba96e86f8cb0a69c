//! Backup filename derivation and reservation.
//!
//! Sealed files are named `{YYYY-MM-DD}.{seq}.log`, where the date is the
//! active file's creation date and `seq` continues from the number of
//! entries already carrying that date prefix. The chosen name is reserved
//! with a create-exclusive open before the caller renames onto it, so two
//! racing sealers can never pick the same target silently.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};

/// Date prefix shared by the ByDate comparison and backup names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper bound on reservation attempts before giving up on a date.
const MAX_RESERVE_ATTEMPTS: usize = 10_000;

/// Reserve a unique backup path in `dir` for a file created at `created_at`.
///
/// Leaves an empty placeholder at the returned path (created exclusively),
/// so the caller's `rename` onto it only ever replaces a file this call
/// reserved. Sequence numbers are zero-padded to three digits and widen
/// past 999. The caller must remove the placeholder if the rename fails.
///
/// If the directory scan itself fails, falls back to a
/// `{date}.{pid}-{nanos}.log` name, still reserved exclusively.
pub fn reserve_backup_path(dir: &Path, created_at: DateTime<Local>) -> io::Result<PathBuf> {
    let date = created_at.format(DATE_FORMAT).to_string();
    let start = match count_date_entries(dir, &date) {
        Ok(count) => count,
        Err(_) => return reserve_fallback(dir, &date),
    };

    for seq in start..start + MAX_RESERVE_ATTEMPTS {
        let candidate = dir.join(format!("{date}.{seq:03}.log"));
        match try_reserve(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free backup name in {} for date {date}", dir.display()),
    ))
}

fn try_reserve(candidate: &Path) -> io::Result<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(candidate)
        .map(|_| ())
}

/// Count directory entries whose name starts with the date prefix.
fn count_date_entries(dir: &Path, date: &str) -> io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(date) {
            count += 1;
        }
    }
    Ok(count)
}

/// Last-resort name when the scan failed: date plus a token distinguishing
/// this process and instant. Never the bare date, never the active name.
fn reserve_fallback(dir: &Path, date: &str) -> io::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let candidate = dir.join(format!("{date}.{pid}-{nanos}.log", pid = std::process::id()));
    try_reserve(&candidate)?;
    Ok(candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
