//! Audit settings for `cfgdrift`
//!
//! All knobs that were once scattered module-level constants live in a
//! single immutable [`AuditSettings`] value passed to each component at
//! construction. Settings persist as TOML in the user's config directory.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default read-only export command sent over the exec channel
///
/// The command must not mutate device state; `hide-sensitive` keeps secrets
/// out of the captured text.
pub const DEFAULT_EXPORT_COMMAND: &str = "/export compact hide-sensitive";

/// Suffix appended to the host identity to form the snapshot file name
pub const DEFAULT_SNAPSHOT_SUFFIX: &str = "_config.txt";

/// File name of the diff artifact handed to the rendering collaborator
pub const DEFAULT_DIFF_FILE_NAME: &str = "diff.txt";

/// File name of the write-only host audit trail
pub const DEFAULT_HOST_LOG_FILE_NAME: &str = "hostname.txt";

/// Settings file name inside the config directory
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Errors that can occur while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file exists but could not be read
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Settings file is not valid TOML
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// Settings could not be written back
    #[error("Failed to write settings file '{path}': {source}")]
    Write {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias for settings operations
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Policy applied when the export command exits with a non-zero status
///
/// The device may emit a valid export body alongside a non-zero status in
/// edge cases, so committing the captured text with a warning is the
/// default. Callers that want strictness opt into [`Self::Fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonZeroExitPolicy {
    /// Treat the captured text as authoritative and record a warning
    #[default]
    CommitWithWarning,
    /// Treat a non-zero exit status as a fatal fetch error
    Fail,
}

impl FromStr for NonZeroExitPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commit-with-warning" | "warn" => Ok(Self::CommitWithWarning),
            "fail" | "strict" => Ok(Self::Fail),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for NonZeroExitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CommitWithWarning => write!(f, "commit-with-warning"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Immutable configuration for one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// SSH port of the device management shell
    #[serde(default = "default_port")]
    pub port: u16,

    /// Read-only export command executed on the device
    #[serde(default = "default_export_command")]
    pub export_command: String,

    /// Suffix appended to the host identity to name the snapshot file
    #[serde(default = "default_snapshot_suffix")]
    pub snapshot_suffix: String,

    /// File name of the diff artifact
    #[serde(default = "default_diff_file_name")]
    pub diff_file_name: String,

    /// File name of the host audit trail
    #[serde(default = "default_host_log_file_name")]
    pub host_log_file_name: String,

    /// Directory holding snapshots, the diff artifact, and the host log.
    /// `None` means the current working directory.
    #[serde(default)]
    pub audit_dir: Option<PathBuf>,

    /// Policy for non-zero export command exit status
    #[serde(default)]
    pub exit_policy: NonZeroExitPolicy,

    /// External rendering command invoked after the diff is committed,
    /// argv-style. Empty disables the hand-off.
    #[serde(default)]
    pub render_command: Vec<String>,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_export_command() -> String {
    DEFAULT_EXPORT_COMMAND.to_string()
}

fn default_snapshot_suffix() -> String {
    DEFAULT_SNAPSHOT_SUFFIX.to_string()
}

fn default_diff_file_name() -> String {
    DEFAULT_DIFF_FILE_NAME.to_string()
}

fn default_host_log_file_name() -> String {
    DEFAULT_HOST_LOG_FILE_NAME.to_string()
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            export_command: DEFAULT_EXPORT_COMMAND.to_string(),
            snapshot_suffix: DEFAULT_SNAPSHOT_SUFFIX.to_string(),
            diff_file_name: DEFAULT_DIFF_FILE_NAME.to_string(),
            host_log_file_name: DEFAULT_HOST_LOG_FILE_NAME.to_string(),
            audit_dir: None,
            exit_policy: NonZeroExitPolicy::default(),
            render_command: Vec::new(),
        }
    }
}

impl AuditSettings {
    /// Creates settings with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the SSH port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the export command
    #[must_use]
    pub fn with_export_command(mut self, command: impl Into<String>) -> Self {
        self.export_command = command.into();
        self
    }

    /// Sets the audit directory
    #[must_use]
    pub fn with_audit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audit_dir = Some(dir.into());
        self
    }

    /// Sets the non-zero exit status policy
    #[must_use]
    pub const fn with_exit_policy(mut self, policy: NonZeroExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    /// Sets the external rendering command
    #[must_use]
    pub fn with_render_command(mut self, command: Vec<String>) -> Self {
        self.render_command = command;
        self
    }

    /// Resolves the directory holding snapshots and the diff artifact
    ///
    /// Falls back to the current working directory when unset, matching the
    /// behavior of running the tool from an audit workspace.
    #[must_use]
    pub fn resolve_audit_dir(&self) -> PathBuf {
        self.audit_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns the default config directory (`<user config dir>/cfgdrift`)
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cfgdrift"))
    }

    /// Loads settings from `<config_dir>/settings.toml`
    ///
    /// A missing file is not an error: defaults are returned so a first run
    /// needs no setup.
    ///
    /// # Errors
    /// Returns `SettingsError::Read` or `SettingsError::Parse` when the file
    /// exists but cannot be used.
    pub fn load(config_dir: &Path) -> SettingsResult<Self> {
        let path = config_dir.join(SETTINGS_FILE_NAME);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };
        toml::from_str(&raw).map_err(|source| SettingsError::Parse { path, source })
    }

    /// Saves settings to `<config_dir>/settings.toml`
    ///
    /// # Errors
    /// Returns `SettingsError::Write` when the directory or file cannot be
    /// created, or `SettingsError::Serialize` on encoding failure.
    pub fn save(&self, config_dir: &Path) -> SettingsResult<()> {
        let path = config_dir.join(SETTINGS_FILE_NAME);
        let raw = toml::to_string_pretty(self)?;
        std::fs::create_dir_all(config_dir).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, raw).map_err(|source| SettingsError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AuditSettings::default();
        assert_eq!(settings.port, 22);
        assert_eq!(settings.export_command, "/export compact hide-sensitive");
        assert_eq!(settings.snapshot_suffix, "_config.txt");
        assert_eq!(settings.diff_file_name, "diff.txt");
        assert_eq!(settings.host_log_file_name, "hostname.txt");
        assert_eq!(settings.exit_policy, NonZeroExitPolicy::CommitWithWarning);
        assert!(settings.render_command.is_empty());
    }

    #[test]
    fn test_builder_methods() {
        let settings = AuditSettings::new()
            .with_port(2222)
            .with_export_command("/export verbose")
            .with_exit_policy(NonZeroExitPolicy::Fail)
            .with_audit_dir("/var/lib/cfgdrift");

        assert_eq!(settings.port, 2222);
        assert_eq!(settings.export_command, "/export verbose");
        assert_eq!(settings.exit_policy, NonZeroExitPolicy::Fail);
        assert_eq!(
            settings.resolve_audit_dir(),
            PathBuf::from("/var/lib/cfgdrift")
        );
    }

    #[test]
    fn test_resolve_audit_dir_defaults_to_cwd() {
        let settings = AuditSettings::default();
        assert_eq!(settings.resolve_audit_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_exit_policy_parse_and_display() {
        assert_eq!(
            "warn".parse::<NonZeroExitPolicy>().unwrap(),
            NonZeroExitPolicy::CommitWithWarning
        );
        assert_eq!(
            "fail".parse::<NonZeroExitPolicy>().unwrap(),
            NonZeroExitPolicy::Fail
        );
        assert!("bogus".parse::<NonZeroExitPolicy>().is_err());
        assert_eq!(
            NonZeroExitPolicy::CommitWithWarning.to_string(),
            "commit-with-warning"
        );
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = AuditSettings::load(dir.path()).unwrap();
        assert_eq!(settings, AuditSettings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let settings = AuditSettings::new()
            .with_port(830)
            .with_exit_policy(NonZeroExitPolicy::Fail)
            .with_render_command(vec!["xelatex".to_string(), "report.tex".to_string()]);

        settings.save(dir.path()).unwrap();
        let loaded = AuditSettings::load(dir.path()).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.toml"), "port = 2200\n").unwrap();

        let settings = AuditSettings::load(dir.path()).unwrap();
        assert_eq!(settings.port, 2200);
        assert_eq!(settings.export_command, DEFAULT_EXPORT_COMMAND);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.toml"), "port = \"not a port\"").unwrap();

        assert!(matches!(
            AuditSettings::load(dir.path()),
            Err(SettingsError::Parse { .. })
        ));
    }
}
