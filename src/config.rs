//! User-level daemon configuration loaded from `~/.shelfd/config.toml`.
//!
//! The file is optional; a missing file or missing fields fall back to
//! their defaults. Command-line flags take precedence over anything set
//! here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::OnCorrupt;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// `[store]` table: where the catalog file lives and what to do when it
/// is unreadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
    pub on_corrupt: Option<OnCorrupt>,
}

/// `[search]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Exact-title search compares case-sensitively when set.
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Top-level user configuration, deserialized from
/// `~/.shelfd/config.toml`.
///
/// All fields are optional at the TOML level; missing fields resolve to
/// their `Default` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Resolve the canonical path for the user config file
/// (`~/.shelfd/config.toml`).
///
/// Co-located with the rest of the user-scoped daemon data
/// (`catalog.json`, `logs/`) so everything user-level lives under one
/// directory.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".shelfd").join("config.toml"))
}

/// Default location of the catalog file (`~/.shelfd/catalog.json`).
#[must_use]
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shelfd")
        .join("catalog.json")
}

/// Load the user configuration from `~/.shelfd/config.toml`.
///
/// Returns `Ok(UserConfig::default())` if the file does not exist so
/// callers never need to handle the "absent file" case specially.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    let path = match user_config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine user config directory; using defaults");
            return Ok(UserConfig::default());
        }
    };

    if !path.exists() {
        debug!("User config not found at {}; using defaults", path.display());
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: UserConfig = toml::from_str(&content)?;
    debug!("Loaded user config from {}", path.display());
    Ok(config)
}
