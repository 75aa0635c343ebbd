//! Panel Settings
//!
//! The panel's own preferences, persisted as TOML in the config directory.
//! The watcher service's configuration is not stored here.

use crate::constants::{MIN_POLL_INTERVAL_MS, NOTICE_CAPACITY, POLL_INTERVAL_MS, SETTINGS_FILE};
use crate::error::Result;
use crate::helpers::get_or_create_config_dir;
use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

fn get_settings_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(SETTINGS_FILE))
}

/// Persisted panel settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Status polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// `en` or `zh`; the system locale is used when unset
    pub locale: Option<String>,
    /// Notices kept in history
    pub notice_capacity: usize,
    /// Also write logs to a daily file in the data directory
    pub log_to_file: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            locale: None,
            notice_capacity: NOTICE_CAPACITY,
            log_to_file: false,
        }
    }
}

impl PanelSettings {
    /// Load from the default location
    pub fn try_load() -> Result<Self> {
        Self::load_from(&get_settings_path()?)
    }

    /// Load from `path`; a missing or blank file yields defaults
    ///
    /// A missing file is created with the defaults so it can be edited.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.save_to(path) {
                warn!(error = %e, path = ?path, "Could not write default settings file");
            }
            return Ok(settings);
        }
        info!(path = ?path, "Loading settings file");
        let value = std::fs::read_to_string(path)?;
        if value.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = toml::from_str(&value).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to parse settings file");
            e
        })?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let value = toml::to_string_pretty(self)?;
        std::fs::write(path, value)?;
        info!(path = ?path, "Settings saved");
        Ok(())
    }

    /// Polling interval, never shorter than the supported minimum
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn locale(&self) -> Locale {
        Locale::resolve(self.locale.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_files_give_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);
        assert_eq!(PanelSettings::load_from(&path).expect("missing"), PanelSettings::default());
        assert!(path.exists());

        std::fs::write(&path, "  \n").expect("write");
        assert_eq!(PanelSettings::load_from(&path).expect("blank"), PanelSettings::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);
        let settings = PanelSettings {
            poll_interval_ms: 5000,
            locale: Some("zh".to_string()),
            notice_capacity: 10,
            log_to_file: true,
        };

        settings.save_to(&path).expect("save");
        let loaded = PanelSettings::load_from(&path).expect("load");

        assert_eq!(loaded, settings);
        assert_eq!(loaded.locale(), Locale::ZhCN);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "poll_interval_ms = 100\n").expect("write");

        let loaded = PanelSettings::load_from(&path).expect("load");

        assert_eq!(loaded.notice_capacity, NOTICE_CAPACITY);
        assert_eq!(loaded.poll_interval(), Duration::from_millis(MIN_POLL_INTERVAL_MS));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "poll_interval_ms = \"fast\"").expect("write");

        assert!(PanelSettings::load_from(&path).is_err());
    }
}
