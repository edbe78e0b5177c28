//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session length and count per day
//! - Tick cadence of the driver
//! - Shell rendering options
//!
//! Configuration is stored at `~/.config/dayfocus/config.toml`. Engine
//! state (timer, tasks, stats) is never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::driver::DriverConfig;
use crate::error::{ConfigError, ValidationError};
use crate::timer::{SessionPlan, DEFAULT_SESSION_SECS, DEFAULT_TOTAL_SESSIONS};

/// Session plan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default = "default_total")]
    pub total: u32,
}

/// Driver tick configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Milliseconds of wall-clock time per countdown second.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

/// Terminal shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Redraw the clock on every tick.
    #[serde(default = "default_true")]
    pub render_ticks: bool,
    /// Print the task list after every task command.
    #[serde(default = "default_true")]
    pub echo_tasks: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayfocus/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

fn default_duration_secs() -> u64 {
    DEFAULT_SESSION_SECS
}
fn default_total() -> u32 {
    DEFAULT_TOTAL_SESSIONS
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_event_capacity() -> usize {
    256
}
fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            total: default_total(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            render_ticks: true,
            echo_tasks: true,
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
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) => {
                    return Err(invalid("cannot overwrite a whole section".into()))
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/dayfocus"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, writing defaults there on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

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

    /// Change a value in memory by dot-separated key, keeping its type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// `apply` then persist to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn session_plan(&self) -> Result<SessionPlan, ValidationError> {
        SessionPlan::new(self.session.duration_secs, self.session.total)
    }

    pub fn driver_config(&self) -> Result<DriverConfig, ValidationError> {
        DriverConfig::new(
            Duration::from_millis(self.ticker.interval_ms),
            self.ticker.event_capacity,
        )
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
        assert_eq!(parsed.session.duration_secs, 1500);
        assert_eq!(parsed.session.total, 4);
        assert_eq!(parsed.ticker.interval_ms, 1000);
        assert!(parsed.shell.render_ticks);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[session]\nduration_secs = 600\n").unwrap();
        assert_eq!(parsed.session.duration_secs, 600);
        assert_eq!(parsed.session.total, 4);
        assert_eq!(parsed.ticker.interval_ms, 1000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.duration_secs").as_deref(), Some("1500"));
        assert_eq!(cfg.get("shell.render_ticks").as_deref(), Some("true"));
        assert!(cfg.get("session.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_number_and_bool() {
        let mut cfg = Config::default();
        cfg.apply("session.total", "6").unwrap();
        cfg.apply("shell.echo_tasks", "false").unwrap();
        assert_eq!(cfg.session.total, 6);
        assert!(!cfg.shell.echo_tasks);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("session.nonexistent", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
        let err = cfg.apply("nope.total", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("shell.render_ticks", "not_a_bool").is_err());
        assert!(cfg.apply("session.total", "-3").is_err());
        assert!(cfg.apply("session", "1").is_err());
        assert_eq!(cfg.session.total, 4);
    }

    #[test]
    fn apply_rejects_value_out_of_range() {
        let mut cfg = Config::default();
        let err = cfg.apply("session.total", "99999999999").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn session_plan_validates() {
        let mut cfg = Config::default();
        assert_eq!(cfg.session_plan().unwrap(), SessionPlan::default());
        cfg.session.total = 0;
        assert!(cfg.session_plan().is_err());
    }

    #[test]
    fn driver_config_rejects_zero_interval() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.driver_config().unwrap().tick_interval(),
            Duration::from_secs(1)
        );
        cfg.ticker.interval_ms = 0;
        assert!(cfg.driver_config().is_err());

        cfg.ticker.interval_ms = 1000;
        cfg.ticker.event_capacity = 0;
        assert!(cfg.driver_config().is_err());
    }
}
