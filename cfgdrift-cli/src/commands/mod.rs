//! Command handler modules for the CLI.

mod diff;
mod run;
mod settings;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Run {
            host,
            port,
            audit_dir,
        } => run::cmd_run(config_path, host.as_deref(), port, audit_dir),
        Commands::Diff { old, new, output } => diff::cmd_diff(&old, &new, output.as_deref()),
        Commands::ShowSettings => settings::cmd_show_settings(config_path),
    }
}
