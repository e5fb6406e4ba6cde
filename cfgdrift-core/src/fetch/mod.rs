//! Configuration export over an SSH exec channel
//!
//! One exec channel per run: the fetcher sends the fixed read-only export
//! command, drains stdout and stderr to EOF, then waits for the remote exit
//! status. Draining must complete before the status is read; stopping early
//! truncates the capture. The channel and the owning session are closed on
//! all paths, success or failure.

use std::io::Read;

use thiserror::Error;

use crate::config::{AuditSettings, NonZeroExitPolicy};
use crate::session::AuthenticatedSession;

/// Errors that can occur while fetching the configuration
#[derive(Debug, Error)]
pub enum FetchError {
    /// The exec channel could not be opened
    #[error("SSH channel open failed: {0}")]
    ChannelOpen(ssh2::Error),

    /// The export command could not be started
    #[error("Exec of '{command}' failed: {source}")]
    Exec {
        /// Command that was sent
        command: String,
        /// Underlying SSH error
        source: ssh2::Error,
    },

    /// A channel stream could not be drained
    #[error("Read from {stream} stream failed: {source}")]
    Read {
        /// Which stream failed ("stdout" or "stderr")
        stream: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The channel could not be closed cleanly
    #[error("Channel close failed: {0}")]
    Close(ssh2::Error),

    /// The remote exit status could not be read
    #[error("Exit status unavailable: {0}")]
    ExitStatus(ssh2::Error),

    /// The capture contains bytes outside the single-byte text range
    #[error("Invalid byte 0x{byte:02x} at offset {position} in {stream} capture")]
    Decode {
        /// Which stream contained the byte
        stream: &'static str,
        /// Byte offset of the first offending byte
        position: usize,
        /// The offending byte
        byte: u8,
    },

    /// The export command exited non-zero under [`NonZeroExitPolicy::Fail`]
    #[error("Export command exited with status {exit_status}: {stderr}")]
    CommandFailed {
        /// Remote exit status
        exit_status: i32,
        /// Captured stderr, trimmed
        stderr: String,
    },
}

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Captured output of one export command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Captured configuration text (stdout)
    pub text: String,
    /// Remote exit status
    pub exit_status: i32,
    /// Captured stderr, trimmed
    pub stderr: String,
}

impl FetchOutcome {
    /// Whether the command completed with a zero exit status
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.exit_status == 0
    }

    /// Warning for a partial success, `None` on a clean run
    ///
    /// A non-zero exit status with captured text is committed anyway, but
    /// must be surfaced to the user distinctly from full success.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        let mut message = format!(
            "export command exited with status {}; captured text committed anyway",
            self.exit_status
        );
        if !self.stderr.is_empty() {
            message.push_str(&format!(" (stderr: {})", self.stderr));
        }
        Some(message)
    }
}

/// Fetches the device configuration over one exec channel
#[derive(Debug, Clone)]
pub struct ConfigFetcher {
    command: String,
    exit_policy: NonZeroExitPolicy,
}

impl ConfigFetcher {
    /// Creates a fetcher for the given export command and exit policy
    #[must_use]
    pub fn new(command: impl Into<String>, exit_policy: NonZeroExitPolicy) -> Self {
        Self {
            command: command.into(),
            exit_policy,
        }
    }

    /// Creates a fetcher from audit settings
    #[must_use]
    pub fn from_settings(settings: &AuditSettings) -> Self {
        Self::new(settings.export_command.clone(), settings.exit_policy)
    }

    /// Returns the export command this fetcher sends
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Runs the export command and captures its output
    ///
    /// Consumes the session; the transport is dropped (closing the socket)
    /// when this returns, on every path.
    ///
    /// # Errors
    /// Returns a `FetchError` for channel, read, decode, or exit-status
    /// failures, and `FetchError::CommandFailed` for a non-zero exit status
    /// under [`NonZeroExitPolicy::Fail`].
    pub fn fetch(&self, session: AuthenticatedSession) -> FetchResult<FetchOutcome> {
        let host = session.host().to_string();
        // `session` is owned by this call, so the transport is dropped on
        // every return path, including when draining fails mid-way.
        let outcome = self.drain_exec(&session)?;

        match outcome.warning() {
            None => {
                tracing::info!(host = %host, bytes = outcome.text.len(), "configuration captured");
            }
            Some(warning) => {
                if self.exit_policy == NonZeroExitPolicy::Fail {
                    return Err(FetchError::CommandFailed {
                        exit_status: outcome.exit_status,
                        stderr: outcome.stderr,
                    });
                }
                tracing::warn!(host = %host, "{warning}");
            }
        }

        Ok(outcome)
    }

    fn drain_exec(&self, session: &AuthenticatedSession) -> FetchResult<FetchOutcome> {
        let mut channel = session
            .session
            .channel_session()
            .map_err(FetchError::ChannelOpen)?;

        channel.exec(&self.command).map_err(|source| FetchError::Exec {
            command: self.command.clone(),
            source,
        })?;

        // Drain both streams to EOF before asking for the exit status. The
        // remote may interleave data arrival with completion signaling, so
        // the status must never be read while bytes are still pending.
        let mut stdout_bytes = Vec::new();
        channel
            .read_to_end(&mut stdout_bytes)
            .map_err(|source| FetchError::Read {
                stream: "stdout",
                source,
            })?;

        let mut stderr_bytes = Vec::new();
        channel
            .stderr()
            .read_to_end(&mut stderr_bytes)
            .map_err(|source| FetchError::Read {
                stream: "stderr",
                source,
            })?;

        channel.close().map_err(FetchError::Close)?;
        channel.wait_close().map_err(FetchError::Close)?;
        let exit_status = channel.exit_status().map_err(FetchError::ExitStatus)?;

        let text = decode_single_byte(&stdout_bytes, "stdout")?;
        let stderr = decode_single_byte(&stderr_bytes, "stderr")?
            .trim()
            .to_string();

        Ok(FetchOutcome {
            text,
            exit_status,
            stderr,
        })
    }
}

/// Decodes captured bytes as single-byte text
///
/// The export body is plain ASCII; any byte outside that range means the
/// capture is not the expected text stream, and no fallback transcoding is
/// attempted.
fn decode_single_byte(bytes: &[u8], stream: &'static str) -> FetchResult<String> {
    match bytes.iter().position(|byte| !byte.is_ascii()) {
        Some(position) => Err(FetchError::Decode {
            stream,
            position,
            byte: bytes[position],
        }),
        // ASCII is valid UTF-8, so the conversion cannot fail here.
        None => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}
