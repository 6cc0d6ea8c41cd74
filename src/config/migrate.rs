//! Config file migrations: older releases wrote fewer keys; newer code
//! expects them all. `fill_missing_keys` merges defaults into the YAML
//! without touching values the user already set.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Keys every current config file must carry.
const REQUIRED_KEYS: &[&str] = &[
    "backend_url",
    "api_key",
    "access_token",
    "account_id",
    "email",
    "store",
    "require_job_refs",
];

/// Return the list of keys missing from the config file on disk.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content).map_err(|_| AppError::ConfigLoad)?;

    let map = match yaml.as_mapping() {
        Some(m) => m,
        None => return Ok(REQUIRED_KEYS.iter().map(|k| k.to_string()).collect()),
    };

    Ok(REQUIRED_KEYS
        .iter()
        .filter(|k| !map.contains_key(&Value::String(k.to_string())))
        .map(|k| k.to_string())
        .collect())
}

/// Fill missing keys with their defaults, rewriting the file only when
/// something was added. Returns the keys that were filled in.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut yaml: Value = serde_yaml::from_str(&content).map_err(|_| AppError::ConfigLoad)?;

    let defaults = serde_yaml::to_value(Config::default()).map_err(|_| AppError::ConfigLoad)?;
    let defaults_map = defaults.as_mapping().ok_or(AppError::ConfigLoad)?;

    let map = yaml.as_mapping_mut().ok_or(AppError::ConfigLoad)?;

    let mut added = Vec::new();
    for key in REQUIRED_KEYS {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k) {
            if let Some(default_value) = defaults_map.get(&k) {
                map.insert(k, default_value.clone());
                added.push(key.to_string());
            }
        }
    }

    if !added.is_empty() {
        let out = serde_yaml::to_string(&yaml).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, out)?;
    }

    Ok(added)
}
