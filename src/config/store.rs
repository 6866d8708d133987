//! JSON file store for the add-on configuration.
//!
//! Writes follow a backup-on-write protocol: the previous file is copied
//! to a `.bak` sibling, the new content is written and re-read, and the
//! backup is only removed once the on-disk content matches what was
//! intended. On a mismatch the backup is restored and the save fails.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::{AddonConfig, ScheduleConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine the user configuration directory")]
    ConfigDirNotFound,

    #[error("config verification failed, previous file restored")]
    VerificationFailed,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the platform configuration directory
    /// (e.g. `~/.config/float-cards/config.json`).
    pub fn default_location() -> Result<Self> {
        dirs::config_dir()
            .map(|p| Self::new(p.join("float-cards").join("config.json")))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Load the configuration, creating it with defaults if it doesn't exist.
    ///
    /// Out-of-range numeric values are clamped on the way in.
    pub fn load(&self) -> Result<AddonConfig> {
        if !self.path.exists() {
            let config = AddonConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path)?;
        let config: AddonConfig = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Save the configuration to disk.
    pub fn save(&self, config: &AddonConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let backup_path = self.backup_path();
        if self.path.exists() {
            if let Err(e) = fs::copy(&self.path, &backup_path) {
                log::warn!("failed to create config backup: {}", e);
            }
        }

        let intended = serde_json::to_value(config)?;
        fs::write(&self.path, serde_json::to_string_pretty(&intended)?)?;

        // Re-read and make sure what landed on disk is what we meant to write.
        let written = fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok());

        if written.as_ref() != Some(&intended) {
            log::error!("config verification failed, restoring backup");
            if backup_path.exists() {
                fs::rename(&backup_path, &self.path)?;
            }
            return Err(ConfigError::VerificationFailed);
        }

        if backup_path.exists() {
            fs::remove_file(&backup_path)?;
        }

        log::debug!("configuration saved to {}", self.path.display());
        Ok(())
    }

    /// Read-modify-write helper for the scheduling section.
    ///
    /// Used by the in-window hotkey toggles (toggle scheduling, toggle
    /// auto-close); returns the full configuration as persisted.
    pub fn update_scheduling<F>(&self, mutate: F) -> Result<AddonConfig>
    where
        F: FnOnce(&mut ScheduleConfig),
    {
        let mut config = self.load()?;
        mutate(&mut config.scheduling);
        let config = config.sanitized();
        self.save(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.json"))
    }

    #[test]
    fn load_creates_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let config = store.load().unwrap();

        assert_eq!(config, AddonConfig::default());
        assert!(store.path().exists());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut config = AddonConfig::default();
        config.scheduling.enabled = true;
        config.scheduling.frequency = 15;
        config.scheduling.deck = "Japanese::Vocab".to_string();
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn save_removes_backup_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&AddonConfig::default()).unwrap();
        let mut config = AddonConfig::default();
        config.scheduling.enabled = true;
        store.save(&config).unwrap();

        let backup = dir.path().join("config.json.bak");
        assert!(!backup.exists());
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn load_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"scheduling": {"enabled": true, "deck": "Kanji"}}"#,
        )
        .unwrap();

        let config = store.load().unwrap();

        assert!(config.scheduling.enabled);
        assert_eq!(config.scheduling.deck, "Kanji");
        assert_eq!(config.scheduling.frequency, 1);
        assert_eq!(config.window_width, 400);
    }

    #[test]
    fn load_clamps_out_of_range_frequency() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"scheduling": {"frequency": 99999}}"#).unwrap();

        let config = store.load().unwrap();
        assert_eq!(
            config.scheduling.frequency,
            crate::config::MAX_FREQUENCY_MINUTES
        );
    }

    #[test]
    fn update_scheduling_persists_the_change() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let updated = store
            .update_scheduling(|scheduling| {
                scheduling.enabled = true;
                scheduling.auto_close_on_answer = true;
            })
            .unwrap();

        assert!(updated.scheduling.enabled);
        assert!(updated.scheduling.auto_close_on_answer);

        let reloaded = store.load().unwrap();
        assert!(reloaded.scheduling.enabled);
        assert!(reloaded.scheduling.auto_close_on_answer);
    }
}
