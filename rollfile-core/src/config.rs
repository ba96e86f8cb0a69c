//! Writer configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::RotationPolicy;

/// Directory the writer targets when none is configured.
pub const DEFAULT_DIRECTORY: &str = "logs";

/// Name of the active file when none is configured.
pub const DEFAULT_BASE_NAME: &str = "default.log";

/// How often the scheduler evaluates the policy by default.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Everything a writer needs at construction time.
///
/// The directory must already exist; the writer never creates it. Creating
/// it is the hosting application's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Directory holding the active file and all sealed backups.
    pub directory: PathBuf,
    /// Name of the active file, constant across rotations.
    pub base_name: String,
    /// Time between policy checks. Must be non-zero.
    pub check_interval: Duration,
    /// When to seal the active file.
    pub policy: RotationPolicy,
}

impl WriterConfig {
    /// Config with the shared defaults and the given policy.
    pub fn with_policy(policy: RotationPolicy) -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            base_name: DEFAULT_BASE_NAME.to_string(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            policy,
        }
    }

    /// Canonical path of the active file.
    pub fn active_path(&self) -> PathBuf {
        self.directory.join(&self.base_name)
    }

    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_name.is_empty() {
            return Err(ConfigError::EmptyBaseName);
        }
        if self.check_interval.is_zero() {
            return Err(ConfigError::ZeroCheckInterval);
        }
        self.policy.validate()
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self::with_policy(RotationPolicy::ByDate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = WriterConfig::default();
        assert_eq!(config.directory, PathBuf::from("logs"));
        assert_eq!(config.base_name, "default.log");
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(config.policy, RotationPolicy::ByDate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn active_path_joins_directory_and_base_name() {
        let mut config = WriterConfig::default();
        config.directory = PathBuf::from("/var/log/app");
        config.base_name = "app.log".to_string();
        assert_eq!(config.active_path(), PathBuf::from("/var/log/app/app.log"));
    }

    #[test]
    fn invalid_intervals_and_names_are_rejected() {
        let mut config = WriterConfig::default();
        config.check_interval = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCheckInterval));

        let mut config = WriterConfig::default();
        config.base_name = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseName));

        let config = WriterConfig::with_policy(RotationPolicy::BySize(0));
        assert_eq!(config.validate(), Err(ConfigError::ZeroSizeThreshold));
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = WriterConfig::with_policy(RotationPolicy::BySize(1024));
        let json = serde_json::to_string(&config).unwrap();
        let back: WriterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.policy, config.policy);
        assert_eq!(back.base_name, config.base_name);
        assert_eq!(back.check_interval, config.check_interval);
    }
}
