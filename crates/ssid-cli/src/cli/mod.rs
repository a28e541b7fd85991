use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::{Commands, InputFormat};

/// Top-level CLI parser for the `ssidmap` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ssidmap",
    version,
    about = "Geolocate WiFi probe-request SSIDs and render them on maps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory (overrides `output.data_dir`)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Extra config file merged above the discovered ones
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Table colors: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Progress bars: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
            config: self.config.clone(),
            color: self.color,
            progress: self.progress,
        }
    }
}
