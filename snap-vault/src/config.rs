use std::path::PathBuf;

use anyhow::{Context, Result};
use vault_core::{VaultConfig, VaultConfigSnapshot};

/// Value of `database.url` that selects the in-memory store.
pub const MEMORY_DATABASE: &str = "memory";

const ENV_MAPPING: &[(&str, &str)] = &[
    ("http.host", "HTTP_HOST"),
    ("http.port", "PORT"),
    ("uploads.dir", "UPLOAD_DIR"),
    ("uploads.max_file_bytes", "UPLOAD_MAX_FILE_BYTES"),
    ("database.url", "DATABASE_URL"),
];

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_file_bytes: u64,
    pub database_url: String,
}

/// Defaults for every key the server reads.
pub fn defaults() -> VaultConfig {
    let mut config = VaultConfig::new();
    config.set("http.host", "0.0.0.0");
    config.set("http.port", "3000");
    config.set("uploads.dir", "uploads");
    config.set("uploads.max_file_bytes", (100u64 * 1024 * 1024).to_string());
    config.set("database.url", "sqlite://snap-vault.db");
    config
}

impl Settings {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = defaults();
        config.overlay_env(ENV_MAPPING);
        Self::from_snapshot(&config.snapshot())
    }

    pub fn from_snapshot(snap: &VaultConfigSnapshot) -> Result<Self> {
        let required = |key: &str| {
            snap.get_string(key)
                .with_context(|| format!("missing config key {key}"))
        };

        let port = snap
            .get_u16("http.port")
            .with_context(|| format!("invalid http.port: {:?}", snap.get("http.port")))?;
        let max_file_bytes = snap.get_u64("uploads.max_file_bytes").with_context(|| {
            format!(
                "invalid uploads.max_file_bytes: {:?}",
                snap.get("uploads.max_file_bytes")
            )
        })?;

        Ok(Self {
            host: required("http.host")?,
            port,
            upload_dir: PathBuf::from(required("uploads.dir")?),
            max_file_bytes,
            database_url: required("database.url")?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let settings = Settings::from_snapshot(&defaults().snapshot()).unwrap();
        assert_eq!(settings.addr(), "0.0.0.0:3000");
        assert_eq!(settings.upload_dir, PathBuf::from("uploads"));
        assert_eq!(settings.max_file_bytes, 104_857_600);
        assert!(!settings.uses_memory_store());
    }

    #[test]
    fn bad_port_is_an_error() {
        let mut config = defaults();
        config.set("http.port", "eighty");
        let err = Settings::from_snapshot(&config.snapshot()).unwrap_err();
        assert!(err.to_string().contains("http.port"));
    }

    #[test]
    fn memory_url_selects_memory_store() {
        let mut config = defaults();
        config.set("database.url", "memory");
        let settings = Settings::from_snapshot(&config.snapshot()).unwrap();
        assert!(settings.uses_memory_store());
    }
}
