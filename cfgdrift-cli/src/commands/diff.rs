//! Offline diff between two saved configuration files.

use std::io::Write;
use std::path::Path;

use cfgdrift_core::diff::diff_lines;
use cfgdrift_core::report;

use crate::error::CliError;

/// Offline diff command handler
pub fn cmd_diff(old: &Path, new: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let old_text = std::fs::read_to_string(old)
        .map_err(|e| CliError::Report(format!("Failed to read '{}': {e}", old.display())))?;
    let new_text = std::fs::read_to_string(new)
        .map_err(|e| CliError::Report(format!("Failed to read '{}': {e}", new.display())))?;

    let lines = diff_lines(&old_text, &new_text);

    if let Some(path) = output {
        report::write_diff(path, &lines).map_err(|e| CliError::Report(e.to_string()))?;
    }

    let mut stdout = std::io::stdout().lock();
    report::render_lines(&lines, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
