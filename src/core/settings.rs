use crate::plugins::shortcuts::types::{find_shortcut, SHORTCUTS};
use crate::shared::errors::StorageError;
use crate::shared::paths::{atomic_write, get_settings_path, resolve_data_dir};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Directory holding `todos.json` and `archive.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Shortcut preference overrides, keyed by preference key.
    #[serde(default)]
    pub shortcuts: BTreeMap<String, String>,
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Unknown preference: {0}")]
    UnknownKey(String),
}

impl AppSettings {
    /// The user's value for a preference, or its default.
    /// `None` when the key is not a known preference.
    pub fn preference(&self, key: &str) -> Option<String> {
        let shortcut = find_shortcut(key)?;
        Some(
            self.shortcuts
                .get(shortcut.key)
                .cloned()
                .unwrap_or_else(|| shortcut.default_value.to_string()),
        )
    }

    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let shortcut = find_shortcut(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        self.shortcuts
            .insert(shortcut.key.to_string(), value.trim().to_string());
        Ok(())
    }

    /// Drops the override so the default applies again. Returns whether one existed.
    pub fn reset_preference(&mut self, key: &str) -> Result<bool, SettingsError> {
        let shortcut = find_shortcut(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        Ok(self.shortcuts.remove(shortcut.key).is_some())
    }

    /// Every preference with its effective value, in toolbar order.
    pub fn preferences(&self) -> Vec<(&'static str, String)> {
        SHORTCUTS
            .iter()
            .map(|s| (s.key, self.preference(s.key).unwrap_or_default()))
            .collect()
    }

    /// Effective data directory, after environment overrides.
    pub fn data_dir(&self) -> PathBuf {
        resolve_data_dir(self.data_dir.as_deref())
    }
}

pub fn load_settings() -> AppSettings {
    load_settings_from(&get_settings_path())
}

/// Loads settings, falling back to defaults when the file is missing or bad.
pub fn load_settings_from(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    match load_settings_from_file(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(target: "system", "Using default settings: {}", e);
            AppSettings::default()
        }
    }
}

fn load_settings_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    save_settings_to(&get_settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let contents = serde_json::to_string_pretty(settings)?;
    atomic_write(path, &contents)?;
    tracing::debug!(target: "system", "Settings saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_come_from_catalog() {
        let settings = AppSettings::default();
        assert_eq!(settings.preference("githubURL").as_deref(), Some("https://github.com"));
        assert_eq!(settings.preference("mailURL").as_deref(), Some("com.microsoft.Outlook"));
        assert_eq!(settings.preference("nope"), None);
    }

    #[test]
    fn test_set_and_reset_preference() {
        let mut settings = AppSettings::default();
        settings.set_preference("genaiURL", " https://chat.openai.com ").unwrap();
        assert_eq!(
            settings.preference("genaiURL").as_deref(),
            Some("https://chat.openai.com")
        );

        assert!(settings.reset_preference("genaiURL").unwrap());
        assert!(!settings.reset_preference("genaiURL").unwrap());
        assert_eq!(settings.preference("genaiURL").as_deref(), Some("https://ai.com"));
    }

    #[test]
    fn test_set_by_button_name_stores_under_key() {
        let mut settings = AppSettings::default();
        settings.set_preference("calc", "com.apple.calculator").unwrap();
        assert!(settings.shortcuts.contains_key("calcURL"));
    }

    #[test]
    fn test_unknown_preference_rejected() {
        let mut settings = AppSettings::default();
        assert!(matches!(
            settings.set_preference("myspaceURL", "https://myspace.com"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_preferences_in_toolbar_order() {
        let settings = AppSettings::default();
        let prefs = settings.preferences();
        assert_eq!(prefs.len(), SHORTCUTS.len());
        assert_eq!(prefs[0].0, "cmcURL");
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");

        let mut settings = AppSettings {
            data_dir: Some(tmp.path().join("data")),
            ..AppSettings::default()
        };
        settings.set_preference("twitterURL", "https://x.com").unwrap();
        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_missing_or_corrupt_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        assert_eq!(load_settings_from(&path), AppSettings::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load_settings_from(&path), AppSettings::default());
    }
}
