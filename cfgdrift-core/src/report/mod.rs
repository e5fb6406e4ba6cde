//! Diff serialization and renderer hand-off
//!
//! The diff record is written once to its sink file and echoed once to the
//! live console stream; both go through [`render_lines`] so the two copies
//! are identical byte for byte. After the sink is committed the optional
//! external rendering collaborator is spawned; its non-zero exit is
//! surfaced distinctly.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::diff::DiffLine;

/// Errors that can occur while writing or rendering the report
#[derive(Debug, Error)]
pub enum ReportError {
    /// The diff sink file could not be written
    #[error("Failed to write diff file '{path}': {source}")]
    Sink {
        /// Path of the diff file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The rendering collaborator could not be spawned
    #[error("Failed to run renderer '{command}': {source}")]
    RendererSpawn {
        /// Command that was attempted
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The rendering collaborator exited non-zero
    #[error("Renderer '{command}' exited with {status}")]
    RendererFailed {
        /// Command that was run
        command: String,
        /// Exit status of the collaborator
        status: std::process::ExitStatus,
    },
}

/// Result type alias for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Renders tagged diff lines to a writer, one line per entry
///
/// Shared by the sink file and the console echo so both carry identical
/// content. An empty diff writes nothing.
///
/// # Errors
/// Propagates the writer's I/O error.
pub fn render_lines<W: Write>(lines: &[DiffLine], writer: &mut W) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Writes the diff record to its sink file
///
/// The file is fully replaced on every run; an empty diff produces an empty
/// file, which is a valid artifact.
///
/// # Errors
/// Returns `ReportError::Sink` when the file cannot be created or written.
pub fn write_diff(path: &Path, lines: &[DiffLine]) -> ReportResult<()> {
    let mut buffer = Vec::new();
    // Writing to a Vec cannot fail; keep the sink write itself to one call.
    render_lines(lines, &mut buffer).map_err(|source| ReportError::Sink {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, buffer).map_err(|source| ReportError::Sink {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), lines = lines.len(), "diff committed");
    Ok(())
}

/// Hands the committed artifacts to the external rendering collaborator
///
/// `command` is argv-style; the first element is the program. The
/// collaborator runs in `workdir` where the diff and snapshot files live,
/// and is expected to produce its document artifact there. Archival and
/// viewer launch are the collaborator's business, not ours.
///
/// # Errors
/// Returns `ReportError::RendererSpawn` when the process cannot start and
/// `ReportError::RendererFailed` when it exits non-zero.
pub fn run_renderer(command: &[String], workdir: &Path) -> ReportResult<()> {
    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };
    let command_line = command.join(" ");

    tracing::info!(command = %command_line, "invoking renderer");
    let status = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .status()
        .map_err(|source| ReportError::RendererSpawn {
            command: command_line.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ReportError::RendererFailed {
            command: command_line,
            status,
        });
    }
    Ok(())
}
