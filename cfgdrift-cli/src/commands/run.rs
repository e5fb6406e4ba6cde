//! Full audit run: connect, authenticate, fetch, rotate, report.

use std::io::Write;
use std::path::{Path, PathBuf};

use cfgdrift_core::CfgDriftError;
use cfgdrift_core::config::AuditSettings;
use cfgdrift_core::diff::diff_lines;
use cfgdrift_core::fetch::ConfigFetcher;
use cfgdrift_core::report;
use cfgdrift_core::session::SessionConnector;
use cfgdrift_core::snapshot::SnapshotStore;

use crate::error::CliError;
use crate::prompt::{ConsoleCredentialSource, prompt_host};
use crate::util::load_settings;

/// Audit run command handler
pub fn cmd_run(
    config_path: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
    audit_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut settings = load_settings(config_path)?;
    if let Some(port) = port {
        settings.port = port;
    }
    if let Some(dir) = audit_dir {
        settings.audit_dir = Some(dir);
    }

    let host = match host.map(str::trim) {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => prompt_host()?,
    };

    tracing::debug!(host, port = settings.port, "starting audit run");
    run_audit(&settings, &host).map_err(CliError::from)
}

/// Strictly sequential audit flow: connect, authenticate, fetch,
/// load-old/store-new, diff, report. Any stage failure terminates the run;
/// nothing is retried.
fn run_audit(settings: &AuditSettings, host: &str) -> Result<(), CfgDriftError> {
    let store = SnapshotStore::from_settings(settings);
    store.record_host(host)?;

    let pending = SessionConnector::from_settings(settings).connect(host)?;
    let session = pending.authenticate(&ConsoleCredentialSource::new())?;

    let outcome = ConfigFetcher::from_settings(settings).fetch(session)?;
    if let Some(warning) = outcome.warning() {
        eprintln!("Warning: {warning}");
    }

    let old_text = store.load_and_replace(host, &outcome.text)?;

    let lines = diff_lines(&old_text, &outcome.text);
    let diff_path = store.dir().join(&settings.diff_file_name);
    report::write_diff(&diff_path, &lines)?;

    // The console stream carries exactly the sink file's content.
    let mut stdout = std::io::stdout().lock();
    report::render_lines(&lines, &mut stdout)?;
    stdout.flush()?;
    drop(stdout);

    if lines.is_empty() {
        eprintln!("No configuration drift for {host}.");
    } else {
        eprintln!(
            "{} changed lines written to {}",
            lines.len(),
            diff_path.display()
        );
    }

    if !settings.render_command.is_empty() {
        report::run_renderer(&settings.render_command, store.dir())?;
    }

    Ok(())
}
