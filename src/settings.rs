use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSettings {
    /// Duration applied when a session is created without an end time.
    pub default_session_minutes: i64,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            default_session_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppSettings {
    scheduling: SchedulingSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scheduling: SchedulingSettings::default(),
        }
    }
}

/// JSON-backed settings file. Missing or unreadable files fall back to
/// defaults; writes persist immediately.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn scheduling(&self) -> SchedulingSettings {
        self.data.read().unwrap().scheduling.clone()
    }

    pub fn update_scheduling(&self, settings: SchedulingSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.scheduling = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path() -> PathBuf {
        std::env::temp_dir().join(format!("coachbase-settings-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let store = SettingsStore::new(temp_settings_path()).unwrap();
        assert_eq!(store.scheduling().default_session_minutes, 60);
    }

    #[test]
    fn update_scheduling_persists_across_reopen() {
        let path = temp_settings_path();

        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_scheduling(SchedulingSettings {
                default_session_minutes: 45,
            })
            .unwrap();
        assert_eq!(store.scheduling().default_session_minutes, 45);

        let reopened = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reopened.scheduling().default_session_minutes, 45);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_settings_path();
        fs::write(&path, "not json").unwrap();

        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.scheduling().default_session_minutes, 60);

        let _ = fs::remove_file(path);
    }
}
