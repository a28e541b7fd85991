use clap::Subcommand;

/// Generated map management.
#[derive(Clone, Debug, Subcommand)]
pub enum MapsCommands {
    /// List generated maps, newest first.
    List,
    /// Open a map in the default browser (0 = newest).
    Open {
        /// Position in `maps list`.
        #[arg(conflicts_with = "latest_summary")]
        index: Option<usize>,
        /// Open the newest summary map instead.
        #[arg(long)]
        latest_summary: bool,
    },
    /// Delete maps older than the given age.
    Clean {
        /// Age threshold in days.
        #[arg(long)]
        older_than_days: u32,
    },
}
