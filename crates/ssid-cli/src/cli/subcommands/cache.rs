use clap::Subcommand;

/// Resolution cache management.
#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    /// List cached entries.
    List,
    /// Show entry counts per status.
    Stats,
    /// Print the JSON schema of the cache file.
    Schema,
    /// Forget one SSID so the next run queries it again.
    Invalidate {
        /// SSID (any case; normalized before lookup).
        ssid: String,
    },
    /// Remove cached entries.
    Clean {
        /// Remove only `not_found`/`error` entries (the default).
        #[arg(long, conflicts_with = "all")]
        failures: bool,
        /// Remove every entry.
        #[arg(long)]
        all: bool,
    },
}
