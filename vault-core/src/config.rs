//! # Configuration
//!
//! A minimal string key/value store. Applications set defaults, then
//! overlay environment variables on top:
//!
//! ```rust
//! use vault_core::VaultConfig;
//!
//! let mut config = VaultConfig::new();
//! config.set("http.port", "3000");
//! config.overlay_env(&[("http.port", "VAULT_DOC_TEST_PORT")]);
//!
//! assert_eq!(config.get("http.port"), Some("3000"));
//! ```
//!
//! Typed access happens on a [`VaultConfigSnapshot`], which is cheap to
//! clone and hand to other components.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct VaultConfig {
    values: HashMap<String, String>,
}

impl VaultConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Override keys from environment variables, `(key, ENV_VAR)` pairs.
    ///
    /// Unset or blank variables leave the current value alone.
    pub fn overlay_env(&mut self, mapping: &[(&str, &str)]) {
        for (key, var) in mapping {
            if let Ok(value) = std::env::var(var) {
                let value = value.trim();
                if !value.is_empty() {
                    tracing::debug!(key, var, "config override from environment");
                    self.set(*key, value);
                }
            }
        }
    }

    pub fn snapshot(&self) -> VaultConfigSnapshot {
        VaultConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VaultConfigSnapshot {
    map: HashMap<String, String>,
}

impl VaultConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.parse::<u16>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }
}
