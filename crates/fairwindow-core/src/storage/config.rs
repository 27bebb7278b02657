//! TOML-based application configuration.
//!
//! Stores the defaults the CLI falls back to when a flag is not given:
//! - Home location and time zone
//! - Activity duration and sampling step
//! - Comfort preference bounds
//! - Forecast provider settings
//!
//! Configuration is stored at `~/.config/fairwindow/config.toml`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::comfort::PreferenceSet;
use crate::error::ConfigError;
use crate::providers::parse::path as json_path;
use crate::providers::ProviderConfig;

/// Where to plan for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// IANA zone name, e.g. "America/Chicago"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Activity length and timeline resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

fn default_duration_minutes() -> i64 {
    60
}
fn default_step_minutes() -> u32 {
    5
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
            step_minutes: default_step_minutes(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/fairwindow/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub preferences: PreferenceSet,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Config {
    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
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
            // Optional fields are left out of the JSON view while unset.
            let new_value = match obj.get(part) {
                Some(Value::Bool(_)) => {
                    Value::Bool(value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    })?)
                }
                Some(Value::Number(_)) => parse_number(value).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as number"),
                    }
                })?,
                Some(Value::Object(_)) | Some(Value::Array(_)) => {
                    serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    })?
                }
                Some(_) => Value::String(value.into()),
                None => parse_number(value).unwrap_or_else(|| Value::String(value.into())),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/fairwindow"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults out on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing the defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
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

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
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
        let val = json_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Flattened `key = value` pairs for every set field.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
            match value {
                Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result is not a valid configuration.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        // Unknown leaves are silently dropped by deserialization.
        if updated.get(key).is_none() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "unknown config key".to_string(),
            });
        }
        updated
            .preferences
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Restore defaults and save.
    pub fn reset() -> Result<Self, ConfigError> {
        let cfg = Self::default();
        cfg.save()?;
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default configuration: {}", e);
            Self::default()
        })
    }
}

fn parse_number(value: &str) -> Option<Value> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
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
        assert_eq!(parsed.activity.duration_minutes, 60);
        assert_eq!(parsed.activity.step_minutes, 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [location]
            latitude = 40.69
            longitude = -89.59
            time_zone = "America/Chicago"

            [preferences]
            temp_min = 60.0
            tempMax = 68.0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.location.latitude, Some(40.69));
        assert_eq!(parsed.location.time_zone.as_deref(), Some("America/Chicago"));
        assert_eq!(parsed.preferences.temp_min, Some(60.0));
        assert_eq!(parsed.preferences.temp_max, Some(68.0));
        assert_eq!(parsed.activity, ActivityConfig::default());
        assert_eq!(parsed.provider, ProviderConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("activity.duration_minutes").as_deref(), Some("60"));
        assert_eq!(cfg.get("provider.weather").as_deref(), Some("open_meteo"));
        assert!(cfg.get("activity.missing_key").is_none());
        assert!(cfg.get("location.latitude").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "activity.step_minutes", "10").unwrap();
        assert_eq!(
            json_path(&json, "activity.step_minutes").unwrap(),
            &Value::Number(10.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "activity.step_minutes", "soon");
        assert!(result.is_err());
    }

    #[test]
    fn set_value_fills_unset_optional_fields() {
        let mut cfg = Config::default();
        cfg.set_value("location.latitude", "40.69").unwrap();
        cfg.set_value("location.time_zone", "America/Chicago").unwrap();
        cfg.set_value("preferences.temp_max", "72").unwrap();

        assert_eq!(cfg.location.latitude, Some(40.69));
        assert_eq!(cfg.location.time_zone.as_deref(), Some("America/Chicago"));
        assert_eq!(cfg.preferences.temp_max, Some(72.0));
    }

    #[test]
    fn set_value_rejects_unknown_keys() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("location.altitude", "200").is_err());
        assert!(cfg.set_value("nonsense", "1").is_err());
        assert!(cfg.set_value("", "1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_value_rejects_wrong_types() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("location.latitude", "north").is_err());
        assert!(cfg.set_value("activity.step_minutes", "-5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_value_rejects_inverted_preferences() {
        let mut cfg = Config::default();
        cfg.set_value("preferences.temp_min", "60").unwrap();
        assert!(cfg.set_value("preferences.temp_max", "50").is_err());
        assert_eq!(cfg.preferences.temp_max, None);
    }

    #[test]
    fn entries_list_every_set_field() {
        let mut cfg = Config::default();
        cfg.set_value("location.longitude", "-89.59").unwrap();
        let entries = cfg.entries();
        assert!(entries.contains(&("location.longitude".to_string(), "-89.59".to_string())));
        assert!(entries.contains(&("activity.duration_minutes".to_string(), "60".to_string())));
        assert!(!entries.iter().any(|(k, _)| k == "location.latitude"));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_value("location.latitude", "35.68").unwrap();
        cfg.set_value("provider.weather", "pirate_weather").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[activity\nduration_minutes = ").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
