pub mod backup;
pub mod routes;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "paramvault")]
#[command(about = "Drive parameter backup over the plant fieldbus.")]
pub struct CommandLine {
    /// Show debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Reduce output: -q results only, -qq errors only.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a topology export and print bridging routes
    #[command(alias = "r")]
    Routes {
        /// Topology document (JSON module records)
        topology: PathBuf,
    },
    /// Back up every eligible module in a topology export
    #[command(alias = "b")]
    Backup {
        /// Topology document (JSON module records)
        topology: PathBuf,
        /// Directory of capture files to replay sessions from
        #[arg(long)]
        replay: PathBuf,
        /// Directory snapshot files are written into
        #[arg(long, default_value = "backups")]
        out: PathBuf,
        /// Per-request timeout in milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
        /// Abort a device on the first failed parameter read instead of
        /// skipping the parameter
        #[arg(long)]
        abort_on_read_failure: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
