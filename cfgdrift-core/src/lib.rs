//! `cfgdrift` Core Library
//!
//! This crate provides the core functionality for the `cfgdrift`
//! configuration audit tool: acquiring an authenticated SSH session to a
//! network device, exporting its running configuration over an exec channel,
//! rotating the on-disk snapshot, and reporting line-level drift.
//!
//! # Crate Structure
//!
//! - [`config`] - Audit settings and persistence
//! - [`credentials`] - Credential types and the injectable credential source
//! - [`session`] - TCP/SSH session establishment and authentication
//! - [`fetch`] - Configuration export over an exec channel
//! - [`snapshot`] - Per-host snapshot rotation
//! - [`diff`] - Line-level diff computation
//! - [`report`] - Diff serialization and renderer hand-off
//! - [`tracing`] - Structured logging initialization

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod diff;
pub mod error;
pub mod fetch;
pub mod report;
pub mod session;
pub mod snapshot;
pub mod tracing;

pub use config::{AuditSettings, NonZeroExitPolicy, SettingsError, SettingsResult};
pub use credentials::{CredentialError, CredentialSource, Credentials, StaticCredentialSource};
pub use diff::{DiffLine, DiffTag, diff_lines};
pub use error::CfgDriftError;
pub use fetch::{ConfigFetcher, FetchError, FetchOutcome, FetchResult};
pub use report::{ReportError, ReportResult, render_lines, run_renderer, write_diff};
pub use session::{
    AuthError, AuthenticatedSession, ConnectError, PendingSession, SessionConnector,
};
pub use snapshot::{SnapshotError, SnapshotResult, SnapshotStore};
pub use tracing::{TracingConfig, TracingError, TracingLevel, TracingResult, init_tracing};
