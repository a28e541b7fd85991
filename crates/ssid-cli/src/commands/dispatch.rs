use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => commands::run::handle(&args, ctx, flags).await,
        Commands::Extract(args) => commands::extract::handle(&args, ctx, flags),
        Commands::Validate(args) => commands::validate::handle(&args, ctx, flags),
        Commands::Cache { mock, action } => commands::cache::handle(&action, mock, ctx, flags),
        Commands::Maps { action } => commands::maps::handle(&action, ctx, flags),
        Commands::Logs { action } => commands::logs::handle(&action, ctx, flags),
    }
}
