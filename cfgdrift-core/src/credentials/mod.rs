//! Credential types and the injectable credential source
//!
//! Credentials are held in memory only for the duration of authentication
//! and are never persisted or logged. Interactive prompting lives behind the
//! [`CredentialSource`] trait so tests and automation can supply canned
//! values without console interaction.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur while obtaining credentials
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The source failed to produce a username or secret
    #[error("Failed to read credentials: {0}")]
    Io(#[from] std::io::Error),

    /// The source produced an empty username
    #[error("Username must not be empty")]
    EmptyUsername,
}

/// A username/secret pair for password authentication
///
/// The secret is wrapped in [`SecretString`] so it is zeroized on drop and
/// redacted from debug output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    secret: SecretString,
}

impl Credentials {
    /// Creates a credential pair
    ///
    /// # Errors
    /// Returns `CredentialError::EmptyUsername` when the username is empty
    /// after trimming.
    pub fn new(username: impl Into<String>, secret: SecretString) -> Result<Self, CredentialError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        Ok(Self { username, secret })
    }

    /// Returns the username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exposes the secret for the authentication call
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of credentials for session authentication
///
/// The console implementation in the CLI prompts interactively (re-prompting
/// while the username is empty and masking the secret). Test implementations
/// return canned values.
pub trait CredentialSource {
    /// Produces the username for `host`
    ///
    /// Implementations must return a non-empty username; the session layer
    /// rejects empty ones rather than looping on a non-interactive source.
    ///
    /// # Errors
    /// Returns `CredentialError` when the username cannot be obtained.
    fn username(&self, host: &str) -> Result<String, CredentialError>;

    /// Produces the secret for `username` at `host`
    ///
    /// # Errors
    /// Returns `CredentialError` when the secret cannot be obtained.
    fn secret(&self, username: &str, host: &str) -> Result<SecretString, CredentialError>;
}

/// Credential source returning fixed values
///
/// Used by tests and non-interactive automation.
#[derive(Clone)]
pub struct StaticCredentialSource {
    username: String,
    secret: SecretString,
}

impl StaticCredentialSource {
    /// Creates a source that always returns the given pair
    #[must_use]
    pub fn new(username: impl Into<String>, secret: SecretString) -> Self {
        Self {
            username: username.into(),
            secret,
        }
    }
}

impl CredentialSource for StaticCredentialSource {
    fn username(&self, _host: &str) -> Result<String, CredentialError> {
        Ok(self.username.clone())
    }

    fn secret(&self, _username: &str, _host: &str) -> Result<SecretString, CredentialError> {
        Ok(self.secret.clone())
    }
}

impl std::fmt::Debug for StaticCredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialSource")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_reject_empty_username() {
        assert!(matches!(
            Credentials::new("", SecretString::from("pw")),
            Err(CredentialError::EmptyUsername)
        ));
        assert!(matches!(
            Credentials::new("   ", SecretString::from("pw")),
            Err(CredentialError::EmptyUsername)
        ));
    }

    #[test]
    fn test_credentials_accessors() {
        let creds = Credentials::new("admin", SecretString::from("hunter2")).unwrap();
        assert_eq!(creds.username(), "admin");
        assert_eq!(creds.secret(), "hunter2");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("admin", SecretString::from("hunter2")).unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_static_source_returns_canned_values() {
        let source = StaticCredentialSource::new("ops", SecretString::from("pw"));
        assert_eq!(source.username("router1").unwrap(), "ops");
        assert_eq!(
            source.secret("ops", "router1").unwrap().expose_secret(),
            "pw"
        );
    }
}
