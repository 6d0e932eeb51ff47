//! Configuration for episode runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Delay before retrying when the environment returns no observation.
pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_secs(5);

/// Delay between the task reset and the first conversational turn.
pub const DEFAULT_WARMUP_DELAY: Duration = Duration::from_secs(30);

/// Options threaded into the episode controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Pause the environment applies after each executed action.
    pub sleep_after_execution: Duration,
    /// Display width requested in conversational mode.
    pub screen_width: u32,
    /// Display height requested in conversational mode.
    pub screen_height: u32,
    /// Wait before retrying after a missing observation.
    pub recovery_delay: Duration,
    /// Stabilization wait before a conversational session starts.
    pub warmup_delay: Duration,
    /// Wall-clock limit loaded from settings. Not enforced by the controller.
    pub time_limit: Option<Duration>,
}

impl EpisodeConfig {
    /// Creates a configuration with the benchmark defaults.
    pub fn new() -> Self {
        Self {
            sleep_after_execution: Duration::ZERO,
            screen_width: 1440,
            screen_height: 900,
            recovery_delay: DEFAULT_RECOVERY_DELAY,
            warmup_delay: DEFAULT_WARMUP_DELAY,
            time_limit: None,
        }
    }

    /// Sets the post-action delay.
    pub fn with_sleep_after_execution(mut self, delay: Duration) -> Self {
        self.sleep_after_execution = delay;
        self
    }

    /// Sets the display resolution used by conversational runs.
    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Sets the missing-observation retry delay.
    pub fn with_recovery_delay(mut self, delay: Duration) -> Self {
        self.recovery_delay = delay;
        self
    }

    /// Sets the conversational warm-up delay.
    pub fn with_warmup_delay(mut self, delay: Duration) -> Self {
        self.warmup_delay = delay;
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Applies values from a loaded settings file.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.time_limit = settings.time_limit.map(Duration::from_secs);
        self
    }

    /// Returns the configured wall-clock limit.
    ///
    /// The limit is carried for callers but no execution mode consults it.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Process settings file (`settings.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Wall-clock limit per episode, in seconds.
    #[serde(default)]
    pub time_limit: Option<u64>,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Settings {
    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses settings from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Default settings location relative to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("./settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_episode_config_defaults() {
        let config = EpisodeConfig::new();
        assert_eq!(config.recovery_delay, Duration::from_secs(5));
        assert_eq!(config.warmup_delay, Duration::from_secs(30));
        assert_eq!(config.sleep_after_execution, Duration::ZERO);
        assert_eq!((config.screen_width, config.screen_height), (1440, 900));
        assert!(config.time_limit().is_none());
    }

    #[test]
    fn test_episode_config_builder() {
        let config = EpisodeConfig::new()
            .with_sleep_after_execution(Duration::from_secs(3))
            .with_screen(1920, 1080)
            .with_recovery_delay(Duration::ZERO)
            .with_warmup_delay(Duration::from_secs(1))
            .with_time_limit(Duration::from_secs(600));

        assert_eq!(config.sleep_after_execution, Duration::from_secs(3));
        assert_eq!(config.screen_width, 1920);
        assert_eq!(config.screen_height, 1080);
        assert_eq!(config.recovery_delay, Duration::ZERO);
        assert_eq!(config.time_limit(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_settings_parse_keeps_unknown_keys() {
        let settings =
            Settings::from_json(r#"{"time_limit": 1200, "model": "gpt-4o"}"#).unwrap();
        assert_eq!(settings.time_limit, Some(1200));
        assert_eq!(
            settings.extra.get("model"),
            Some(&serde_json::Value::String("gpt-4o".to_string()))
        );

        let config = EpisodeConfig::new().with_settings(&settings);
        assert_eq!(config.time_limit(), Some(Duration::from_secs(1200)));
    }

    #[test]
    fn test_settings_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{"time_limit": 60}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.time_limit, Some(60));
    }

    #[test]
    fn test_settings_load_errors() {
        let temp = TempDir::new().unwrap();
        let missing = Settings::load(temp.path().join("missing.json"));
        assert!(matches!(missing, Err(SettingsError::Read { .. })));

        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
    }
}
