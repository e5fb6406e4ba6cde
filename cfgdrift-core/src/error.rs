//! Top-level error type aggregating the per-module error enums.
//!
//! Every stage of an audit run has its own error type living next to the
//! code that produces it; this enum exists so callers that drive the whole
//! run can propagate any stage failure with `?`.

use thiserror::Error;

use crate::config::SettingsError;
use crate::fetch::FetchError;
use crate::report::ReportError;
use crate::session::{AuthError, ConnectError};
use crate::snapshot::SnapshotError;

/// Aggregate error for a full audit run
///
/// Each variant wraps the error of one run stage. No stage is retried:
/// any of these is terminal for the run.
#[derive(Debug, Error)]
pub enum CfgDriftError {
    /// Settings could not be loaded or saved
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// TCP connect or SSH negotiation failed
    #[error("Connection error: {0}")]
    Connect(#[from] ConnectError),

    /// The remote rejected the supplied credentials
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The configuration export failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The snapshot file could not be rotated
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The diff could not be written or the renderer failed
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Other I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
