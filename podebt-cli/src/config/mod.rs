//! Application configuration
//!
//! Settings live in a TOML file at `<config_dir>/podebt/config.toml`
//! (overridable with `PODEBT_CONFIG`). API tokens come from the
//! environment only. A missing file yields defaults: uploads and the area
//! lookup are disabled and local processing still works.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable pointing at an alternate config file
pub const CONFIG_PATH_VAR: &str = "PODEBT_CONFIG";
/// Bearer token for the warehouse API
pub const WAREHOUSE_TOKEN_VAR: &str = "PODEBT_WAREHOUSE_TOKEN";
/// Bearer token for the object-storage API
pub const STORAGE_TOKEN_VAR: &str = "PODEBT_STORAGE_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub warehouse: Option<WarehouseConfig>,
    pub storage: Option<StorageConfig>,
    pub areas: Option<AreaConfig>,
}

/// Warehouse table endpoints (append target plus the rate source table)
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    pub base_url: String,
    pub dataset: String,
    pub table: String,
    pub rates_table: String,
}

/// Object-storage endpoints for the report artifact
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub base_url: String,
    /// Base for public download URLs; defaults to `base_url`
    pub public_base_url: Option<String>,
    pub bucket: String,
}

/// Requester-to-area directory source
#[derive(Debug, Clone, Deserialize)]
pub struct AreaConfig {
    pub csv_url: String,
}

impl AppConfig {
    /// Load from the env-pointed path, then the default location.
    /// A missing file is not an error.
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_PATH_VAR) {
            Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
            _ => default_config_path(),
        };

        let Some(path) = path else {
            log::warn!("no config directory available, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            log::warn!(
                "config file {} not found, uploads and area lookup disabled",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    fn from_path(path: &PathBuf) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        log::debug!("config loaded from {}", path.display());
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("podebt").join("config.toml"))
}

/// Non-empty token from the environment
pub fn env_token(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
