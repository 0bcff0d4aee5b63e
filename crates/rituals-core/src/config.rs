//! TOML-based configuration.
//!
//! A handful of timing constants per ritual plus the log directory. The
//! value is loaded once per process and handed to each flow explicitly.
//!
//! Configuration is stored at `~/.config/rituals/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::ritual::Ritual;

/// Returns `~/.config/rituals[-dev]/` based on RITUALS_ENV.
///
/// Set RITUALS_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RITUALS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("rituals-dev")
    } else {
        base_dir.join("rituals")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Breathing session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StillnessConfig {
    #[serde(default = "default_stillness_arrival")]
    pub arrival_secs: u64,
    #[serde(default = "default_integrate")]
    pub integrate_secs: u64,
    #[serde(default = "default_stillness_frame")]
    pub frame_ms: u64,
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    #[serde(default = "default_deep_bar_width")]
    pub deep_bar_width: usize,
    /// Borderless live view.
    #[serde(default = "default_true")]
    pub zen_mode: bool,
    #[serde(default = "default_whisper_min")]
    pub whisper_min_secs: u64,
    #[serde(default = "default_whisper_show")]
    pub whisper_show_secs: u64,
    #[serde(default = "default_mind_show")]
    pub mind_show_secs: u64,
    #[serde(default = "default_stillness_minutes")]
    pub default_minutes: u32,
    /// How long the closing card waits for a key.
    #[serde(default = "default_return_wait")]
    pub return_wait_secs: u64,
}

/// Focus session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_one_arrival")]
    pub arrival_secs: u64,
    #[serde(default = "default_one_frame")]
    pub frame_ms: u64,
}

/// Journaling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UntangleConfig {
    /// Show the previous sentence on the prompt.
    #[serde(default)]
    pub recall_last: bool,
    #[serde(default = "default_linger")]
    pub linger_ms: u64,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the `*_log.jsonl` files live. Defaults to the data directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub stillness: StillnessConfig,
    #[serde(default)]
    pub one: OneConfig,
    #[serde(default)]
    pub untangle: UntangleConfig,
}

fn default_true() -> bool {
    true
}
fn default_stillness_arrival() -> u64 {
    30
}
fn default_integrate() -> u64 {
    12
}
fn default_stillness_frame() -> u64 {
    80
}
fn default_bar_width() -> usize {
    18
}
fn default_deep_bar_width() -> usize {
    10
}
fn default_whisper_min() -> u64 {
    35
}
fn default_whisper_show() -> u64 {
    4
}
fn default_mind_show() -> u64 {
    60
}
fn default_stillness_minutes() -> u32 {
    5
}
fn default_return_wait() -> u64 {
    10
}
fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_one_arrival() -> u64 {
    10
}
fn default_one_frame() -> u64 {
    1000
}
fn default_linger() -> u64 {
    1100
}

impl Default for StillnessConfig {
    fn default() -> Self {
        Self {
            arrival_secs: default_stillness_arrival(),
            integrate_secs: default_integrate(),
            frame_ms: default_stillness_frame(),
            bar_width: default_bar_width(),
            deep_bar_width: default_deep_bar_width(),
            zen_mode: true,
            whisper_min_secs: default_whisper_min(),
            whisper_show_secs: default_whisper_show(),
            mind_show_secs: default_mind_show(),
            default_minutes: default_stillness_minutes(),
            return_wait_secs: default_return_wait(),
        }
    }
}

impl Default for OneConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            arrival_secs: default_one_arrival(),
            frame_ms: default_one_frame(),
        }
    }
}

impl Default for UntangleConfig {
    fn default() -> Self {
        Self {
            recall_last: false,
            linger_ms: default_linger(),
        }
    }
}

impl StillnessConfig {
    pub fn arrival(&self) -> Duration {
        Duration::from_secs(self.arrival_secs)
    }

    pub fn integrate(&self) -> Duration {
        Duration::from_secs(self.integrate_secs)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn return_wait(&self) -> Duration {
        Duration::from_secs(self.return_wait_secs)
    }
}

impl OneConfig {
    pub fn arrival(&self) -> Duration {
        Duration::from_secs(self.arrival_secs)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
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
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
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

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
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

    /// Parse the config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("falling back to default config: {e}");
                Self::default()
            }
        }
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Update a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// existing type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Directory holding the per-ritual logs.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => dir.clone(),
            None => data_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn log_path(&self, ritual: Ritual) -> PathBuf {
        self.log_dir().join(ritual.log_file_name())
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
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[one]\nwork_minutes = 50\n").unwrap();
        assert_eq!(parsed.one.work_minutes, 50);
        assert_eq!(parsed.one.break_minutes, 5);
        assert_eq!(parsed.stillness.arrival_secs, 30);
        assert!(!parsed.untangle.recall_last);
        assert!(parsed.log_dir.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("one.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("stillness.zen_mode").as_deref(), Some("true"));
        assert!(cfg.get("one.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_nested_number_and_bool() {
        let mut cfg = Config::default();
        cfg.set_value("one.break_minutes", "10").unwrap();
        cfg.set_value("untangle.recall_last", "true").unwrap();
        assert_eq!(cfg.one.break_minutes, 10);
        assert!(cfg.untangle.recall_last);
    }

    #[test]
    fn set_value_accepts_log_dir_string() {
        let mut cfg = Config::default();
        cfg.set_value("log_dir", "/tmp/rituals").unwrap();
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/tmp/rituals")));
        assert_eq!(
            cfg.log_path(Ritual::One),
            PathBuf::from("/tmp/rituals/one_log.jsonl")
        );
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("one.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("stillness.zen_mode", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.stillness.zen_mode);
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set_value("stillness.frame_ms", "40").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.stillness.frame_ms, 40);
    }

    #[test]
    fn zero_frame_is_clamped() {
        let mut cfg = Config::default();
        cfg.one.frame_ms = 0;
        assert_eq!(cfg.one.frame(), Duration::from_millis(1));
    }
}
