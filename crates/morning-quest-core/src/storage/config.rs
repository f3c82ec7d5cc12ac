//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Departure time used for brand-new heroes
//! - Defaults for tasks created with "add task"
//! - Log level for the CLI
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::routine::{DepartureTime, TaskDefaults};

/// Routine defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineConfig {
    #[serde(default)]
    pub default_departure: DepartureTime,
    #[serde(default = "default_task_minutes")]
    pub default_task_minutes: u32,
    #[serde(default = "default_task_points")]
    pub default_task_points: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routine: RoutineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_task_minutes() -> u32 {
    5
}
fn default_task_points() -> u32 {
    10
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            default_departure: DepartureTime::default(),
            default_task_minutes: default_task_minutes(),
            default_task_points: default_task_points(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;
        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                serde_json::Value::Bool(value.parse::<bool>().map_err(|e| invalid(e.to_string()))?)
            }
            serde_json::Value::Number(_) => {
                let n = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk, writing the defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (including malformed `HH:MM` departure times).
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Defaults applied to tasks created with "add task".
    pub fn task_defaults(&self) -> TaskDefaults {
        TaskDefaults {
            duration: self.routine.default_task_minutes.max(1),
            points: self.routine.default_task_points,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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
        assert_eq!(parsed.routine.default_departure.to_string(), "08:00");
        assert_eq!(parsed.routine.default_task_minutes, 5);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[routine]\ndefault_departure = \"07:45\"\n").unwrap();
        assert_eq!(parsed.routine.default_departure.to_string(), "07:45");
        assert_eq!(parsed.routine.default_task_points, 10);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("routine.default_departure").as_deref(), Some("08:00"));
        assert_eq!(cfg.get("routine.default_task_minutes").as_deref(), Some("5"));
        assert!(cfg.get("routine.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("routine.default_task_points", "25").unwrap();
        cfg.apply("routine.default_departure", "07:30").unwrap();
        cfg.apply("logging.level", "debug").unwrap();
        assert_eq!(cfg.routine.default_task_points, 25);
        assert_eq!(cfg.routine.default_departure.to_string(), "07:30");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("routine.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("nope", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("routine.default_task_minutes", "many").is_err());
        assert!(cfg.apply("routine.default_departure", "25:00").is_err());
        assert_eq!(cfg.routine.default_departure.to_string(), "08:00");
    }

    #[test]
    fn task_defaults_never_zero_minutes() {
        let mut cfg = Config::default();
        cfg.routine.default_task_minutes = 0;
        assert_eq!(cfg.task_defaults().duration, 1);
    }
}
