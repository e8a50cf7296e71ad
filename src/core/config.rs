//! Runtime configuration for the combat core.
//!
//! Loaded from `grindstone.json` in the platform config directory. A missing or
//! unreadable file yields the defaults so a fresh install never fails to start.

use super::constants::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "grindstone.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Seed for the process-wide PRNG (None = seeded from entropy)
    pub seed: Option<u64>,
    /// Inactivity window for each interaction wait, clamped to 60-300s
    pub interaction_timeout_secs: u64,
    /// Auto mode emits a snapshot every N turns
    pub auto_snapshot_every: u32,
    /// Giga-auto mode emits a snapshot every N turns
    pub giga_snapshot_every: u32,
    /// Auto modes hand control back once HP falls to this fraction of max
    pub auto_stop_hp_fraction: f64,
    /// Where snapshots are written (None = platform data directory)
    pub data_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            seed: None,
            interaction_timeout_secs: DEFAULT_INTERACTION_TIMEOUT_SECS,
            auto_snapshot_every: AUTO_SNAPSHOT_EVERY,
            giga_snapshot_every: GIGA_SNAPSHOT_EVERY,
            auto_stop_hp_fraction: AUTO_STOP_HP_FRACTION,
            data_dir: None,
        }
    }
}

impl CoreConfig {
    /// Normalizes out-of-range values instead of rejecting the whole file.
    pub fn sanitized(mut self) -> Self {
        self.interaction_timeout_secs = self
            .interaction_timeout_secs
            .clamp(MIN_INTERACTION_TIMEOUT_SECS, MAX_INTERACTION_TIMEOUT_SECS);
        self.auto_snapshot_every = self.auto_snapshot_every.max(1);
        self.giga_snapshot_every = self.giga_snapshot_every.max(1);
        self.auto_stop_hp_fraction = self.auto_stop_hp_fraction.clamp(0.0, 1.0);
        self
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<CoreConfig>(&json) {
                Ok(config) => config.sanitized(),
                Err(e) => {
                    tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Loads the config from the platform config directory.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Directory for store snapshots.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| {
            ProjectDirs::from("", "", "grindstone").map(|dirs| dirs.data_dir().to_path_buf())
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "grindstone").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.interaction_timeout_secs, 120);
        assert_eq!(config.auto_snapshot_every, 1);
        assert_eq!(config.giga_snapshot_every, 10);
    }

    #[test]
    fn test_sanitized_clamps_timeout() {
        let config = CoreConfig {
            interaction_timeout_secs: 5,
            giga_snapshot_every: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.interaction_timeout_secs, 60);
        assert_eq!(config.giga_snapshot_every, 1);

        let config = CoreConfig {
            interaction_timeout_secs: 10_000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.interaction_timeout_secs, 300);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CoreConfig = serde_json::from_str(r#"{"seed": 42}"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.interaction_timeout_secs, 120);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let path = std::env::temp_dir().join("grindstone-missing-config-test.json");
        let _ = fs::remove_file(&path);
        assert_eq!(CoreConfig::load_from(&path), CoreConfig::default());
    }

    #[test]
    fn test_load_invalid_file_returns_default() {
        let path = std::env::temp_dir().join("grindstone-invalid-config-test.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(CoreConfig::load_from(&path), CoreConfig::default());
        fs::remove_file(path).ok();
    }
}
