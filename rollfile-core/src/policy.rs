//! Rotation decision policies.
//!
//! A policy answers one question at each scheduler tick: should the active
//! file be sealed now? The decision is pure apart from a filesystem stat in
//! the size case, and it is evaluated only at ticks — never on the write
//! path.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// When the active file should be sealed and replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Rotate once the local calendar date moves past the active file's
    /// creation date. Fires at most once per distinct day regardless of
    /// how often the scheduler checks.
    ByDate,

    /// Rotate once the active file's on-disk size exceeds this many bytes.
    ///
    /// The size is sampled with a stat at check time, so the file may
    /// overshoot the threshold by up to one check interval's worth of
    /// writes before rotation fires. That slack is intentional; the writer
    /// does not track a running byte counter.
    BySize(u64),

    /// Rotate once this much wall-clock time has elapsed since the active
    /// file was created. Re-armed from each new file's creation time.
    ByDuration(Duration),
}

impl RotationPolicy {
    /// Reject thresholds that would make the policy fire on every tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            RotationPolicy::ByDate => Ok(()),
            RotationPolicy::BySize(0) => Err(ConfigError::ZeroSizeThreshold),
            RotationPolicy::BySize(_) => Ok(()),
            RotationPolicy::ByDuration(d) if d.is_zero() => {
                Err(ConfigError::ZeroDurationThreshold)
            }
            RotationPolicy::ByDuration(_) => Ok(()),
        }
    }

    /// Decide whether the active file should rotate now.
    ///
    /// A failed stat in the size case (file missing, permissions changed)
    /// means "do not rotate this tick"; the next tick re-evaluates.
    pub fn should_rotate(&self, created_at: DateTime<Local>, active_path: &Path) -> bool {
        self.should_rotate_at(created_at, active_path, Local::now())
    }

    fn should_rotate_at(
        &self,
        created_at: DateTime<Local>,
        active_path: &Path,
        now: DateTime<Local>,
    ) -> bool {
        match self {
            RotationPolicy::ByDate => now.date_naive() > created_at.date_naive(),
            RotationPolicy::BySize(threshold) => match std::fs::metadata(active_path) {
                Ok(meta) => meta.len() > *threshold,
                Err(_) => false,
            },
            RotationPolicy::ByDuration(limit) => match (now - created_at).to_std() {
                Ok(elapsed) => elapsed > *limit,
                // created_at in the future: the clock moved; wait it out.
                Err(_) => false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::rstest;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn no_file() -> PathBuf {
        PathBuf::from("/nonexistent/active.log")
    }

    #[test]
    fn by_date_does_not_rotate_within_the_same_day() {
        let now = Local::now();
        assert!(!RotationPolicy::ByDate.should_rotate_at(now, &no_file(), now));
    }

    #[test]
    fn by_date_rotates_once_the_calendar_day_advances() {
        let now = Local::now();
        let created = now - TimeDelta::days(1);
        assert!(RotationPolicy::ByDate.should_rotate_at(created, &no_file(), now));
    }

    #[test]
    fn by_date_ignores_elapsed_hours_within_one_date() {
        // 23 hours apart but the same calendar date must not rotate.
        let now = Local::now();
        let created = now - TimeDelta::hours(23);
        let expected = now.date_naive() > created.date_naive();
        assert_eq!(
            RotationPolicy::ByDate.should_rotate_at(created, &no_file(), now),
            expected,
        );
    }

    #[rstest]
    #[case(100, 50, false)] // under threshold
    #[case(100, 100, false)] // exactly at threshold: strictly-greater contract
    #[case(100, 101, true)] // over threshold
    fn by_size_compares_on_disk_size_strictly(
        #[case] threshold: u64,
        #[case] file_bytes: usize,
        #[case] expected: bool,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("active.log");
        fs::write(&path, vec![b'x'; file_bytes]).unwrap();

        let now = Local::now();
        assert_eq!(
            RotationPolicy::BySize(threshold).should_rotate_at(now, &path, now),
            expected,
        );
    }

    #[test]
    fn by_size_treats_stat_failure_as_do_not_rotate() {
        let now = Local::now();
        assert!(!RotationPolicy::BySize(1).should_rotate_at(now, &no_file(), now));
    }

    #[rstest]
    #[case(60, 30, false)] // half elapsed
    #[case(60, 60, false)] // exactly elapsed: strictly-greater contract
    #[case(60, 61, true)] // past the limit
    fn by_duration_compares_elapsed_strictly(
        #[case] limit_secs: u64,
        #[case] elapsed_secs: i64,
        #[case] expected: bool,
    ) {
        let now = Local::now();
        let created = now - TimeDelta::seconds(elapsed_secs);
        let policy = RotationPolicy::ByDuration(Duration::from_secs(limit_secs));
        assert_eq!(policy.should_rotate_at(created, &no_file(), now), expected);
    }

    #[test]
    fn by_duration_waits_out_a_backwards_clock() {
        let now = Local::now();
        let created = now + TimeDelta::seconds(10);
        let policy = RotationPolicy::ByDuration(Duration::from_secs(1));
        assert!(!policy.should_rotate_at(created, &no_file(), now));
    }

    #[test]
    fn zero_thresholds_are_rejected() {
        assert_eq!(
            RotationPolicy::BySize(0).validate(),
            Err(ConfigError::ZeroSizeThreshold)
        );
        assert_eq!(
            RotationPolicy::ByDuration(Duration::ZERO).validate(),
            Err(ConfigError::ZeroDurationThreshold)
        );
        assert!(RotationPolicy::ByDate.validate().is_ok());
        assert!(RotationPolicy::BySize(1).validate().is_ok());
        assert!(RotationPolicy::ByDuration(Duration::from_secs(1))
            .validate()
            .is_ok());
    }
}
