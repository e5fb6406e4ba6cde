//! Interactive console prompts for host and credentials.
//!
//! All prompts write to stderr so stdout stays reserved for the diff
//! stream. Prompts block without a timeout; the run waits on the operator.

use std::io::{BufRead, Write};

use secrecy::SecretString;

use cfgdrift_core::credentials::{CredentialError, CredentialSource};

use crate::error::CliError;

/// Reads one trimmed line from stdin after printing `prompt` to stderr
fn read_line(prompt: &str) -> std::io::Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompts for the device address, re-prompting while empty
///
/// # Errors
/// Returns `CliError::Prompt` when stdin cannot be read.
pub fn prompt_host() -> Result<String, CliError> {
    loop {
        let host = read_line("Device address: ")
            .map_err(|e| CliError::Prompt(format!("Failed to read device address: {e}")))?;
        if !host.is_empty() {
            return Ok(host);
        }
    }
}

/// Credential source backed by console prompts
///
/// The username prompt repeats while empty; the password prompt is masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleCredentialSource;

impl ConsoleCredentialSource {
    /// Creates a console credential source
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CredentialSource for ConsoleCredentialSource {
    fn username(&self, _host: &str) -> Result<String, CredentialError> {
        loop {
            let username = read_line("Username: ")?;
            if !username.is_empty() {
                return Ok(username);
            }
        }
    }

    fn secret(&self, username: &str, host: &str) -> Result<SecretString, CredentialError> {
        eprint!("Password for {username}@{host}: ");
        std::io::stderr().flush()?;
        let password = rpassword::read_password()?;
        Ok(SecretString::from(password))
    }
}
