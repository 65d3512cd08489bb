//! File System Utilities
//!
//! Configuration directory management.

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "i18n-sync", "i18n-sync").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/i18n-sync/` or `$XDG_CONFIG_HOME/i18n-sync/`
/// - **macOS**: `~/Library/Application Support/com.i18n-sync.i18n-sync/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\i18n-sync\i18n-sync\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    let config_dir = project_dirs.config_dir();

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    Ok(config_dir.to_path_buf())
}
