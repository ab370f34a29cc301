use std::env;
use std::path::PathBuf;

use crate::error::{InventoryError, InventoryResult};

pub const DEFAULT_DATA_FILE: &str = "warehouse_data.txt";
pub const DEFAULT_REQUEST_BUFFER: usize = 32;
pub const DEFAULT_ALERT_BUFFER: usize = 64;

/// Startup settings for an [`InventorySystem`](super::InventorySystem).
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    /// Flat file the inventory is loaded from and saved to.
    pub data_file: PathBuf,
    /// Requests that may queue up before callers wait to submit.
    pub request_buffer: usize,
    /// Alerts a slow subscriber may lag behind before missing some.
    pub alert_buffer: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            request_buffer: DEFAULT_REQUEST_BUFFER,
            alert_buffer: DEFAULT_ALERT_BUFFER,
        }
    }
}

impl InventoryConfig {
    pub fn with_data_file(path: impl Into<PathBuf>) -> Self {
        Self {
            data_file: path.into(),
            ..Self::default()
        }
    }

    /// Reads `INVENTORY_DATA_FILE`, `INVENTORY_REQUEST_BUFFER` and
    /// `INVENTORY_ALERT_BUFFER`. Unset variables keep their defaults.
    pub fn from_env() -> InventoryResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> InventoryResult<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup("INVENTORY_DATA_FILE").filter(|p| !p.trim().is_empty()) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup("INVENTORY_REQUEST_BUFFER") {
            config.request_buffer = parse_capacity("INVENTORY_REQUEST_BUFFER", &raw)?;
        }
        if let Some(raw) = lookup("INVENTORY_ALERT_BUFFER") {
            config.alert_buffer = parse_capacity("INVENTORY_ALERT_BUFFER", &raw)?;
        }
        Ok(config)
    }
}

fn parse_capacity(key: &str, raw: &str) -> InventoryResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(InventoryError::InvalidConfig(format!(
            "{} must be a positive integer, got {:?}",
            key, raw
        ))),
        Ok(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = InventoryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, InventoryConfig::default());
        assert_eq!(config.data_file, PathBuf::from("warehouse_data.txt"));
    }

    #[test]
    fn test_overrides() {
        let config = InventoryConfig::from_lookup(lookup(&[
            ("INVENTORY_DATA_FILE", "/var/lib/stock.txt"),
            ("INVENTORY_REQUEST_BUFFER", "8"),
            ("INVENTORY_ALERT_BUFFER", " 128 "),
        ]))
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/var/lib/stock.txt"));
        assert_eq!(config.request_buffer, 8);
        assert_eq!(config.alert_buffer, 128);
    }

    #[test]
    fn test_bad_capacity_rejected() {
        for bad in ["0", "-1", "lots"] {
            let err = InventoryConfig::from_lookup(lookup(&[("INVENTORY_ALERT_BUFFER", bad)])).unwrap_err();
            assert!(matches!(err, InventoryError::InvalidConfig(_)));
        }
    }
}
