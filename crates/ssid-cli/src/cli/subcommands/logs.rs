use clap::Subcommand;

/// Session log management.
#[derive(Clone, Debug, Subcommand)]
pub enum LogsCommands {
    /// List session logs, newest first.
    List,
    /// Show a session log (0 = newest).
    Show {
        /// Position in `logs list`.
        index: Option<usize>,
    },
    /// Delete session logs older than the given age.
    Clean {
        /// Age threshold in days.
        #[arg(long)]
        older_than_days: u32,
    },
}
