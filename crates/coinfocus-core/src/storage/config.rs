//! TOML-based application configuration.
//!
//! Stores the session presets offered to the user:
//! - Duration choices for a new task
//! - Rest length between rounds
//! - Round override (split long tasks into shorter rounds)
//!
//! Configuration is stored at `~/.config/coinfocus/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Session presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minute choices offered when creating a task.
    #[serde(default = "default_task_options")]
    pub task_options: Vec<u32>,
    #[serde(default = "default_rest_duration_secs")]
    pub rest_duration_secs: u64,
    /// Round length in minutes; 0 runs the whole task as one round.
    #[serde(default = "default_round_override_minutes")]
    pub round_override_minutes: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/coinfocus/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
}

// Default functions
fn default_task_options() -> Vec<u32> {
    vec![10, 20, 30, 40]
}
fn default_rest_duration_secs() -> u64 {
    180
}
fn default_round_override_minutes() -> f64 {
    10.0
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            task_options: default_task_options(),
            rest_duration_secs: default_rest_duration_secs(),
            round_override_minutes: default_round_override_minutes(),
        }
    }
}

impl SessionConfig {
    /// Round length to use for a task of `total_minutes`.
    pub fn round_minutes_for(&self, total_minutes: f64) -> f64 {
        if self.round_override_minutes > 0.0 {
            self.round_override_minutes
        } else {
            total_minutes
        }
    }

    /// Minutes of the 1-based preset `choice` from `task_options`.
    ///
    /// # Errors
    /// Returns `InvalidValue` when `choice` is out of range.
    pub fn preset_minutes(&self, choice: usize) -> Result<u32, ConfigError> {
        choice
            .checked_sub(1)
            .and_then(|i| self.task_options.get(i))
            .copied()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "session.task_options".to_string(),
                message: format!(
                    "preset {choice} does not exist, choose 1 to {}",
                    self.task_options.len()
                ),
            })
    }

    /// # Errors
    /// Returns `InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.task_options.is_empty() {
            return Err(invalid("session.task_options", "at least one option is required"));
        }
        if self.task_options.contains(&0) {
            return Err(invalid("session.task_options", "options must be positive"));
        }
        if self.rest_duration_secs == 0 {
            return Err(invalid("session.rest_duration_secs", "must be positive"));
        }
        if !self.round_override_minutes.is_finite() || self.round_override_minutes < 0.0 {
            return Err(invalid(
                "session.round_override_minutes",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
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
        let bad_value = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| bad_value(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| bad_value(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(bad_value(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| bad_value(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `config.toml` inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// See [`Config::save`].
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
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not persist.
    ///
    /// The new value must pass [`Config::validate`]; on failure the config
    /// is left unchanged.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or is out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid_value = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid_value(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| invalid_value(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    /// See [`SessionConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()
    }

}
