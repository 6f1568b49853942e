//! TOML-based application configuration.
//!
//! Stores user preferences for reward amounts and reminder behavior.
//! Configuration is stored at `~/.config/wakescroll/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::storage::data_dir;

fn default_journal_xp() -> u32 {
    10
}

fn default_timer_xp() -> u32 {
    25
}

fn default_catch_scroll_tap_xp() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// XP awarded for each kind of mindful action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_journal_xp")]
    pub journal_xp: u32,
    #[serde(default = "default_timer_xp")]
    pub timer_xp: u32,
    #[serde(default = "default_catch_scroll_tap_xp")]
    pub catch_scroll_tap_xp: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            journal_xp: default_journal_xp(),
            timer_xp: default_timer_xp(),
            catch_scroll_tap_xp: default_catch_scroll_tap_xp(),
        }
    }
}

/// Reminder behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/wakescroll/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Config {
    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/wakescroll"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Set a configuration value by dotted key, as used by `config set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "rewards.journal_xp" => {
                self.rewards.journal_xp = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "rewards.timer_xp" => {
                self.rewards.timer_xp = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "rewards.catch_scroll_tap_xp" => {
                self.rewards.catch_scroll_tap_xp = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "notifications.enabled" => {
                self.notifications.enabled = value.parse().map_err(|_| invalid("expected true or false".into()))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rewards.journal_xp, 10);
        assert_eq!(config.rewards.timer_xp, 25);
        assert_eq!(config.rewards.catch_scroll_tap_xp, 1);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.rewards.journal_xp = 42;
        config.notifications.enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.rewards.journal_xp, 42);
        assert!(!loaded.notifications.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rewards]\njournal_xp = 7\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rewards.journal_xp, 7);
        assert_eq!(config.rewards.timer_xp, 25);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn set_value_by_dotted_key() {
        let mut config = Config::default();
        config.set_value("rewards.timer_xp", "50").unwrap();
        assert_eq!(config.rewards.timer_xp, 50);

        config.set_value("notifications.enabled", "false").unwrap();
        assert!(!config.notifications.enabled);

        assert!(config.set_value("nope.key", "1").is_err());
        assert!(config.set_value("rewards.timer_xp", "abc").is_err());
    }
}
