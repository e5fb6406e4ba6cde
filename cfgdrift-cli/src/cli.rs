//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// `cfgdrift` command-line interface for auditing device configuration drift
#[derive(Parser)]
#[command(name = "cfgdrift")]
#[command(version, about = "Configuration drift audit for network devices")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "CFGDRIFT_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a full audit against a device
    #[command(about = "Fetch the device configuration, rotate the snapshot, report drift")]
    Run {
        /// Device address (prompted for when omitted)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// SSH port (overrides the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding snapshots and the diff artifact
        #[arg(short, long)]
        audit_dir: Option<PathBuf>,
    },

    /// Diff two configuration files offline
    #[command(about = "Report line-level drift between two saved configuration files")]
    Diff {
        /// The older configuration file
        old: PathBuf,

        /// The newer configuration file
        new: PathBuf,

        /// Also write the diff to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective settings
    #[command(about = "Show the effective audit settings as TOML")]
    ShowSettings,
}
