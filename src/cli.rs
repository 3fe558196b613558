use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "adsync")]
#[command(author, version, about = "Playhead normalization and ad-beacon scheduling")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON-lines player trace and print delivered beacons
    Replay {
        /// Trace file to replay
        #[arg(required = true)]
        trace: PathBuf,

        /// Output every session event as JSON
        #[arg(long)]
        json: bool,

        /// Disable playhead normalization for this run
        #[arg(long)]
        raw: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
