//! CLI error types and exit codes.

use cfgdrift_core::CfgDriftError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - settings, snapshot, diff, or other local failures
    pub const GENERAL_ERROR: i32 = 1;
    /// Remote failure - connect, authenticate, or fetch against the device
    pub const REMOTE_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Settings error
    #[error("Settings error: {0}")]
    Settings(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connect(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration fetch error
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Snapshot rotation error
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Diff report error
    #[error("Report error: {0}")]
    Report(String),

    /// Interactive prompt error
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CfgDriftError> for CliError {
    fn from(err: CfgDriftError) -> Self {
        match err {
            CfgDriftError::Settings(e) => Self::Settings(e.to_string()),
            CfgDriftError::Connect(e) => Self::Connect(e.to_string()),
            CfgDriftError::Auth(e) => Self::Auth(e.to_string()),
            CfgDriftError::Fetch(e) => Self::Fetch(e.to_string()),
            CfgDriftError::Snapshot(e) => Self::Snapshot(e.to_string()),
            CfgDriftError::Report(e) => Self::Report(e.to_string()),
            CfgDriftError::Io(e) => Self::Io(e),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (settings, snapshot, report, prompt, IO)
    /// - 2: Remote failure (connect, authenticate, fetch)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Connect(_) | Self::Auth(_) | Self::Fetch(_) => exit_codes::REMOTE_FAILURE,
            Self::Settings(_)
            | Self::Snapshot(_)
            | Self::Report(_)
            | Self::Prompt(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
