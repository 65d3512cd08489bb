//! Configuration
//!
//! Optional `i18n-sync.toml` in the platform config directory. Every field
//! has a default, so an empty file is a valid configuration.

use crate::constants::{
    AUTO_REFRESH_ON_LANG_CHANGE, CONFIG_FILE_NAME, COOKIE_FILE_NAME, DEFAULT_LANGUAGE_CODE,
    RELOAD_DELAY_MS,
};
use crate::error::Result;
use crate::helpers::get_or_create_config_dir;
use crate::i18n::{Language, convert_to_language_code};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};

fn get_config_path() -> Result<PathBuf> {
    let config_dir = get_or_create_config_dir()?;
    let path = config_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        std::fs::write(&path, "")?;
    }
    Ok(path)
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Fallback language code
    pub base_language: String,
    /// Directory with `<language>/<group>.json` files; embedded resources
    /// are used when unset
    pub resource_dir: Option<PathBuf>,
    pub auto_refresh_on_language_change: bool,
    pub reload_delay_ms: u64,
    /// Default tracing filter directive, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            base_language: DEFAULT_LANGUAGE_CODE.to_string(),
            resource_dir: None,
            auto_refresh_on_language_change: AUTO_REFRESH_ON_LANG_CHANGE,
            reload_delay_ms: RELOAD_DELAY_MS,
            log_level: "info".to_string(),
        }
    }
}

impl I18nConfig {
    /// Load from the config directory, creating an empty file if missing
    pub fn try_load() -> Result<Self> {
        let path = get_config_path()?;
        info!(path = ?path, "Loading config file");
        let value = std::fs::read_to_string(&path)?;

        Self::from_toml_str(&value).map_err(|e| {
            error!(error = %e, path = ?path, "Failed to parse config file");
            e
        })
    }

    /// Parse from TOML; empty input yields defaults
    pub fn from_toml_str(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(value)?)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Base language, unknown codes mapping to English
    pub fn base_language(&self) -> Language {
        convert_to_language_code(&self.base_language)
    }

    /// Location of the file-backed preference store
    pub fn cookie_path() -> Result<PathBuf> {
        Ok(get_or_create_config_dir()?.join(COOKIE_FILE_NAME))
    }
}
