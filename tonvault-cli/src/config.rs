//! Configuration

use serde_json::{json, Map, Value};
use std::fs;
use std::path::PathBuf;
use tonvault_error::{Result, VaultError};
use tonvault_ton::TonNetwork;
use tracing::{debug, warn};

/// JSON config file with defaults for every known key.
///
/// Unknown keys are kept, so `config set` can store anything.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Config {
    /// Default values. Loaded files are merged over these.
    pub fn defaults() -> Map<String, Value> {
        let defaults = json!({
            "tonapi_key": "",
            "swap_coffee_key": "",
            "dyor_key": "",
            "default_wallet": "",
            "network": "mainnet",
            "limits": {
                "max_transfer_ton": 100,
                "require_confirmation": true
            }
        });
        match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Loads `path`. A missing or unreadable file yields the defaults;
    /// otherwise top-level keys from the file replace the defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut values = Self::defaults();

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(stored)) => values.extend(stored),
                Ok(_) => {
                    warn!(path = %path.display(), "config is not a JSON object, using defaults")
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config is corrupted, using defaults")
                }
            },
            Err(_) => debug!(path = %path.display(), "no config file, using defaults"),
        }

        Self { path, values }
    }

    /// Writes the config as pretty JSON, creating the directory
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    /// All values, defaults included
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Dot-notation lookup, e.g. `limits.max_transfer_ton`
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        parts.try_fold(self.values.get(first)?, |value, part| value.as_object()?.get(part))
    }

    /// Dot-notation assignment. Missing or non-object intermediates are
    /// replaced by empty objects.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(VaultError::ConfigError(format!("invalid key '{key}'")));
        }

        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| VaultError::ConfigError("empty key".into()))?;

        let mut target = &mut self.values;
        for part in parents {
            let entry = target
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            target = entry
                .as_object_mut()
                .ok_or_else(|| VaultError::ConfigError(format!("cannot descend into '{part}'")))?;
        }
        target.insert(last.to_string(), value);
        Ok(())
    }

    /// Configured network, mainnet if unset or unknown
    pub fn network(&self) -> TonNetwork {
        self.get("network")
            .and_then(Value::as_str)
            .and_then(|n| n.parse().ok())
            .unwrap_or_default()
    }

    /// Default wallet identifier, if one is set
    pub fn default_wallet(&self) -> Option<&str> {
        self.get("default_wallet")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config::load(dir.path().join("config.json"))
    }

    #[test]
    fn test_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        assert_eq!(config.get("network"), Some(&json!("mainnet")));
        assert_eq!(config.get("limits.max_transfer_ton"), Some(&json!(100)));
        assert_eq!(config.get("limits.require_confirmation"), Some(&json!(true)));
        assert_eq!(config.network(), TonNetwork::Mainnet);
        assert!(config.default_wallet().is_none());
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn test_merge_over_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"network": "testnet", "custom": 42}"#,
        )
        .unwrap();

        let config = config_in(&dir);
        assert_eq!(config.network(), TonNetwork::Testnet);
        assert_eq!(config.get("custom"), Some(&json!(42)));
        assert_eq!(config.get("tonapi_key"), Some(&json!("")));
        assert!(config.get("limits").is_some());
    }

    #[test]
    fn test_corrupted_file_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        let config = config_in(&dir);
        assert_eq!(config.values(), &Config::defaults());
    }

    #[test]
    fn test_get_missing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        assert!(config.get("nope").is_none());
        assert!(config.get("limits.nope").is_none());
        assert!(config.get("network.deeper").is_none());
    }

    #[test]
    fn test_set_and_persist() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.set("limits.max_transfer_ton", json!(5)).unwrap();
        config.set("default_wallet", json!("main")).unwrap();
        config.set("a.b.c", json!("deep")).unwrap();
        config.save().unwrap();

        let reloaded = config_in(&dir);
        assert_eq!(reloaded.get("limits.max_transfer_ton"), Some(&json!(5)));
        assert_eq!(reloaded.get("limits.require_confirmation"), Some(&json!(true)));
        assert_eq!(reloaded.default_wallet(), Some("main"));
        assert_eq!(reloaded.get("a.b.c"), Some(&json!("deep")));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.set("network.name", json!("x")).unwrap();
        assert_eq!(config.get("network.name"), Some(&json!("x")));
        assert_eq!(config.network(), TonNetwork::Mainnet);
    }

    #[test]
    fn test_set_rejects_empty_segment() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        assert!(config.set("limits..x", json!(1)).is_err());
        assert!(config.set("", json!(1)).is_err());
    }
}
