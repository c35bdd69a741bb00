//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Default size of a delivered capture chunk (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default log level for the binary
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted values for `log_level`
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recording length for `record`
    pub duration: Option<String>,
    /// Input device name; the host default when unset
    pub device: Option<String>,
    /// Directory for clips written without an explicit `--output`
    pub output_dir: Option<String>,
    /// Maximum bytes per delivered capture chunk
    pub chunk_size: Option<usize>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            duration: Some("10s".to_string()),
            device: None,
            output_dir: Some(".".to_string()),
            chunk_size: Some(DEFAULT_CHUNK_SIZE),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            duration: other.duration.or(self.duration),
            device: other.device.or(self.device),
            output_dir: other.output_dir.or(self.output_dir),
            chunk_size: other.chunk_size.or(self.chunk_size),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get output directory, or the working directory if not set
    pub fn output_dir_or_default(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(".")
    }

    /// Get chunk size, or the default if not set or zero
    pub fn chunk_size_or_default(&self) -> usize {
        self.chunk_size
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// Get log level, or "warn" if not set/invalid
    pub fn log_level_or_default(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|level| VALID_LOG_LEVELS.contains(level))
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::Duration;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.duration, Some("10s".to_string()));
        assert!(config.device.is_none());
        assert_eq!(config.output_dir, Some(".".to_string()));
        assert_eq!(config.chunk_size, Some(DEFAULT_CHUNK_SIZE));
        assert_eq!(config.log_level, Some("warn".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.duration.is_none());
        assert!(config.device.is_none());
        assert!(config.output_dir.is_none());
        assert!(config.chunk_size.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            duration: Some("10s".to_string()),
            device: Some("built-in".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            duration: None, // Should not override
            device: Some("usb headset".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.duration, Some("10s".to_string())); // Kept from base
        assert_eq!(merged.device, Some("usb headset".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            chunk_size: Some(1024),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.chunk_size, Some(1024));
        assert_eq!(merged.log_level, Some("debug".to_string()));
    }

    #[test]
    fn default_duration_matches_recording_default() {
        let duration: Duration = AppConfig::defaults().duration.unwrap().parse().unwrap();
        assert_eq!(duration, Duration::default());
    }

    #[test]
    fn chunk_size_zero_falls_back() {
        let config = AppConfig {
            chunk_size: Some(0),
            ..Default::default()
        };
        assert_eq!(config.chunk_size_or_default(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn log_level_invalid_falls_back() {
        let config = AppConfig {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert_eq!(config.log_level_or_default(), "warn");

        let config = AppConfig {
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        assert_eq!(config.log_level_or_default(), "debug");
    }

    #[test]
    fn output_dir_defaults_to_cwd() {
        assert_eq!(AppConfig::empty().output_dir_or_default(), ".");
    }
}
