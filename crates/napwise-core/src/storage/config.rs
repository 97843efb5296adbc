//! TOML-based application configuration.
//!
//! Stores per-device settings:
//! - Which shared space to read and write
//! - Where the row store lives
//! - Calendar export target and time zone
//! - The access gate's passphrase digest
//!
//! Household settings shared between caregivers (constraints, roster) live in
//! the row store instead, see [`crate::settings::Settings`].
//!
//! Configuration is stored at `~/.config/napwise/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Row store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; empty means `napwise.db` in the data directory.
    #[serde(default)]
    pub database: String,
}

/// Calendar export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// IANA zone attached to exported event times.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

/// Access gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Hex SHA-256 of the household passphrase; empty disables the gate.
    #[serde(default)]
    pub passphrase_sha256: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/napwise/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The shared space all records belong to.
    #[serde(default = "default_space")]
    pub space: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

// Default functions
fn default_space() -> String {
    "home".into()
}
fn default_calendar_id() -> String {
    "primary".into()
}
fn default_time_zone() -> String {
    "UTC".into()
}
fn default_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".into()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: default_calendar_id(),
            time_zone: default_time_zone(),
            api_base: default_api_base(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            space: default_space(),
            storage: StorageConfig::default(),
            calendar: CalendarConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        let b = value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?;
                        serde_json::Value::Bool(b)
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: "not a leaf value".to_string(),
                        });
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Resolved path of the row store database.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if self.storage.database.trim().is_empty() {
            Ok(data_dir()?.join("napwise.db"))
        } else {
            Ok(PathBuf::from(self.storage.database.trim()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.space, "home");
        assert_eq!(parsed.calendar.calendar_id, "primary");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("space = \"lake-house\"\n[calendar]\ntime_zone = \"Europe/Oslo\"\n").unwrap();
        assert_eq!(parsed.space, "lake-house");
        assert_eq!(parsed.calendar.time_zone, "Europe/Oslo");
        assert_eq!(parsed.calendar.calendar_id, "primary");
        assert!(parsed.access.passphrase_sha256.is_empty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.time_zone").as_deref(), Some("UTC"));
        assert_eq!(cfg.get("space").as_deref(), Some("home"));
        assert!(cfg.get("calendar").is_none());
        assert!(cfg.get("calendar.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_string() {
        let mut cfg = Config::default();
        cfg.set("calendar.calendar_id", "family@group.calendar.google.com")
            .unwrap();
        assert_eq!(cfg.calendar.calendar_id, "family@group.calendar.google.com");
    }

    #[test]
    fn set_rejects_unknown_and_non_leaf_keys() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("calendar.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("calendar", "value"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("", "value").is_err());
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.space = "grandparents".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.space, "grandparents");
    }

    #[test]
    fn database_path_override() {
        let mut cfg = Config::default();
        cfg.storage.database = "/tmp/napwise-test.db".into();
        assert_eq!(
            cfg.database_path().unwrap(),
            PathBuf::from("/tmp/napwise-test.db")
        );
    }
}
