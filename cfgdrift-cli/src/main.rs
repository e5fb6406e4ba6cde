//! `cfgdrift` CLI - configuration drift audit for network devices
//!
//! Connects to a device's management shell over SSH, exports its running
//! configuration, rotates the saved snapshot, and reports line-level drift.

mod cli;
mod commands;
mod error;
mod prompt;
mod util;

use clap::Parser;

use cfgdrift_core::tracing::{TracingConfig, TracingLevel, init_tracing};
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        match cli.verbose {
            0 => TracingLevel::Warn,
            1 => TracingLevel::Info,
            2 => TracingLevel::Debug,
            _ => TracingLevel::Trace,
        }
    };
    if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
