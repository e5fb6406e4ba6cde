//! Shared utility functions used across command modules.

use std::path::Path;

use cfgdrift_core::config::AuditSettings;

use crate::error::CliError;

/// Loads settings from the optional custom config directory from CLI args,
/// falling back to the default config directory, then to built-in defaults.
pub fn load_settings(config_path: Option<&Path>) -> Result<AuditSettings, CliError> {
    let dir = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => AuditSettings::default_config_dir(),
    };
    match dir {
        Some(dir) => AuditSettings::load(&dir)
            .map_err(|e| CliError::Settings(format!("Failed to load settings: {e}"))),
        None => Ok(AuditSettings::default()),
    }
}
