use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{models::Coordinates, ScoreMode, StoreError};

const APP_DIR: &str = "asset-tracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the Asset Tracker API, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Budget for the reachability probe before the device counts as offline.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default)]
    pub score_mode: ScoreMode,
    /// Position reported by the fixed locator when no GPS is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_probe_timeout_secs() -> u64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            score_mode: ScoreMode::default(),
            latitude: None,
            longitude: None,
            state_path: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf, config::ConfigError> {
        Ok(dirs::config_dir()
            .ok_or_else(|| {
                config::ConfigError::Message("Cannot determine config directory".into())
            })?
            .join(APP_DIR)
            .join("config.toml"))
    }

    /// Load the config file (if any) overlaid with `ASSET_TRACKER_*` variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("ASSET_TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn default_position(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }

    /// Where the persisted `AppState` lives.
    pub fn state_path(&self) -> Result<PathBuf, StoreError> {
        if let Some(path) = &self.state_path {
            return Ok(path.clone());
        }
        Ok(dirs::data_dir()
            .ok_or(StoreError::NoStateDir)?
            .join(APP_DIR)
            .join("state.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.score_mode, ScoreMode::Compatible);
        assert_eq!(config.default_position(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "api_url = \"https://tracker.example.com\"").unwrap();
        writeln!(file, "score_mode = \"normalized\"").unwrap();
        writeln!(file, "latitude = 23.8").unwrap();
        writeln!(file, "longitude = 90.4").unwrap();

        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.api_url, "https://tracker.example.com");
        assert_eq!(config.score_mode, ScoreMode::Normalized);
        assert_eq!(config.default_position(), Some(Coordinates::new(23.8, 90.4)));
    }

    #[test]
    fn half_a_position_is_no_position() {
        let config = AppConfig {
            latitude: Some(1.0),
            ..AppConfig::default()
        };
        assert_eq!(config.default_position(), None);
    }
}
