//! SSH session establishment and authentication
//!
//! A session moves through two states: [`SessionConnector::connect`] yields
//! a [`PendingSession`] (TCP connected, transport negotiated), and
//! [`PendingSession::authenticate`] upgrades it to an
//! [`AuthenticatedSession`] ready for one exec-channel fetch. Connection and
//! negotiation failures are fatal for the run and never retried.
//!
//! No timeouts are enforced on connect or authentication; callers wanting
//! robustness against unresponsive hosts should add one at the socket level.

use std::net::TcpStream;

use thiserror::Error;

use crate::config::AuditSettings;
use crate::credentials::{CredentialError, CredentialSource, Credentials};

/// Errors that can occur while establishing the transport
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Host identity is empty
    #[error("Host must not be empty")]
    EmptyHost,

    /// TCP handshake failed
    #[error("TCP connect to {host}:{port} failed: {source}")]
    Tcp {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The SSH session could not be allocated
    #[error("SSH session init failed: {0}")]
    SessionInit(ssh2::Error),

    /// SSH protocol negotiation failed
    #[error("SSH negotiation with {host}:{port} failed: {source}")]
    Negotiation {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Underlying SSH error
        source: ssh2::Error,
    },
}

/// Errors that can occur during authentication
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential source failed
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The remote rejected the supplied credentials
    #[error("Authentication for {username}@{host} rejected: {source}")]
    Rejected {
        /// Username that was offered
        username: String,
        /// Target host
        host: String,
        /// Underlying SSH error
        source: ssh2::Error,
    },

    /// The auth call returned without error but the session is not
    /// authenticated
    #[error("Authentication for {username}@{host} did not complete")]
    Incomplete {
        /// Username that was offered
        username: String,
        /// Target host
        host: String,
    },
}

/// Opens the TCP socket and negotiates the SSH transport
#[derive(Debug, Clone, Copy)]
pub struct SessionConnector {
    port: u16,
}

impl SessionConnector {
    /// Creates a connector for the given port
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    /// Creates a connector from audit settings
    #[must_use]
    pub const fn from_settings(settings: &AuditSettings) -> Self {
        Self::new(settings.port)
    }

    /// Returns the configured port
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Connects to `host` and negotiates the SSH transport
    ///
    /// Blocks until the OS-level connect succeeds or fails; no application
    /// timeout is applied.
    ///
    /// # Errors
    /// Returns `ConnectError::Tcp` when the socket cannot be opened and
    /// `ConnectError::Negotiation` when the SSH handshake fails. Both are
    /// fatal for the run.
    pub fn connect(&self, host: &str) -> Result<PendingSession, ConnectError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ConnectError::EmptyHost);
        }

        tracing::debug!(host, port = self.port, "opening TCP socket");
        let tcp = TcpStream::connect((host, self.port)).map_err(|source| ConnectError::Tcp {
            host: host.to_string(),
            port: self.port,
            source,
        })?;

        let mut session = ssh2::Session::new().map_err(ConnectError::SessionInit)?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|source| ConnectError::Negotiation {
                host: host.to_string(),
                port: self.port,
                source,
            })?;

        tracing::info!(host, port = self.port, "SSH transport negotiated");
        Ok(PendingSession {
            session,
            host: host.to_string(),
        })
    }
}

/// A negotiated but not yet authenticated session
pub struct PendingSession {
    session: ssh2::Session,
    host: String,
}

impl PendingSession {
    /// Returns the host this session is connected to
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Authenticates with a password pulled from the credential source
    ///
    /// Consumes the pending session; on failure the transport is dropped and
    /// with it the underlying socket.
    ///
    /// # Errors
    /// Returns `AuthError::Credential` when the source cannot produce a
    /// username/secret pair and `AuthError::Rejected` when the remote
    /// refuses it.
    pub fn authenticate(
        self,
        source: &dyn CredentialSource,
    ) -> Result<AuthenticatedSession, AuthError> {
        let username = source.username(&self.host)?;
        let secret = source.secret(&username, &self.host)?;
        let credentials = Credentials::new(username, secret)?;

        self.session
            .userauth_password(credentials.username(), credentials.secret())
            .map_err(|source| AuthError::Rejected {
                username: credentials.username().to_string(),
                host: self.host.clone(),
                source,
            })?;

        if !self.session.authenticated() {
            return Err(AuthError::Incomplete {
                username: credentials.username().to_string(),
                host: self.host,
            });
        }

        tracing::info!(
            host = %self.host,
            username = credentials.username(),
            "session authenticated"
        );
        Ok(AuthenticatedSession {
            session: self.session,
            host: self.host,
        })
    }
}

/// An authenticated session ready for one exec-channel fetch
///
/// Owned exclusively by the fetcher for the duration of one fetch; dropping
/// it closes the transport and the underlying socket.
pub struct AuthenticatedSession {
    pub(crate) session: ssh2::Session,
    host: String,
}

impl AuthenticatedSession {
    /// Returns the host this session is connected to
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_port() {
        let connector = SessionConnector::new(2222);
        assert_eq!(connector.port(), 2222);
    }

    #[test]
    fn test_connector_from_settings() {
        let settings = AuditSettings::new().with_port(830);
        assert_eq!(SessionConnector::from_settings(&settings).port(), 830);
    }

    #[test]
    fn test_connect_rejects_empty_host() {
        let connector = SessionConnector::new(22);
        assert!(matches!(
            connector.connect(""),
            Err(ConnectError::EmptyHost)
        ));
        assert!(matches!(
            connector.connect("   "),
            Err(ConnectError::EmptyHost)
        ));
    }
}
