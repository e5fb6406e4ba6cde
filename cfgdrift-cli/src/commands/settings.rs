//! Print the effective audit settings.

use std::path::Path;

use crate::error::CliError;
use crate::util::load_settings;

/// Show-settings command handler
pub fn cmd_show_settings(config_path: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let rendered = toml::to_string_pretty(&settings)
        .map_err(|e| CliError::Settings(format!("Failed to render settings: {e}")))?;
    print!("{rendered}");
    Ok(())
}
