use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{CacheCommands, LogsCommands, MapsCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Import a capture, resolve every valid SSID and write maps.
    Run(RunArgs),
    /// Import a capture and list unique SSIDs with their verdicts.
    Extract(ExtractArgs),
    /// Check SSIDs against the validation rules.
    Validate(ValidateArgs),
    /// Resolution cache management.
    Cache {
        /// Operate on the mock-mode cache file.
        #[arg(long)]
        mock: bool,
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Generated map management.
    Maps {
        #[command(subcommand)]
        action: MapsCommands,
    },
    /// Session log management.
    Logs {
        #[command(subcommand)]
        action: LogsCommands,
    },
}

/// Capture file formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum InputFormat {
    /// tshark/tcpdump text output with `SSID=` fields.
    Text,
    /// One probe record JSON object per line.
    Jsonl,
    /// A JSON array of probe records.
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Capture file to process.
    pub input: PathBuf,
    /// Input format (defaults to the file extension, then text).
    #[arg(long)]
    pub input_format: Option<InputFormat>,
    /// Answer lookups offline with deterministic mock coordinates.
    #[arg(long)]
    pub mock: bool,
    /// Query again SSIDs whose cached outcome is a failure.
    #[arg(long)]
    pub requery_failures: bool,
    /// Open the summary map when done.
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    /// Capture file to read.
    pub input: PathBuf,
    /// Input format (defaults to the file extension, then text).
    #[arg(long)]
    pub input_format: Option<InputFormat>,
    /// Only list accepted SSIDs.
    #[arg(long)]
    pub accepted_only: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// SSIDs to check.
    #[arg(required = true)]
    pub ssids: Vec<String>,
}
