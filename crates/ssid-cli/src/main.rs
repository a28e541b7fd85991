use clap::Parser;

mod bootstrap;
mod capture;
mod cli;
mod commands;
mod context;
mod output;
mod pipeline;
mod progress;
mod ui;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("ssidmap error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(&flags)?;
    ui::init(&flags);

    let config = bootstrap::load_config(&flags)?;
    context::warn_unconfigured(&config);

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(write_lock::acquire(&config.output.lock_path()).await?)
    } else {
        None
    };

    let mut ctx = context::AppContext::new(config)?;
    let result = commands::dispatch::dispatch(command, &mut ctx, &flags).await;
    drop(write_lock);
    result
}

/// Default filter when `SSIDMAP_LOG` is unset. `--quiet` wins over `--verbose`.
const fn log_level(flags: &cli::GlobalFlags) -> &'static str {
    if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_tracing(flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SSIDMAP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level(flags)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn command_requires_write_lock(command: &cli::Commands) -> bool {
    use crate::cli::subcommands::CacheCommands;

    match command {
        cli::Commands::Run(_) => true,
        cli::Commands::Cache { action, .. } => matches!(
            action,
            CacheCommands::Invalidate { .. } | CacheCommands::Clean { .. }
        ),
        cli::Commands::Maps { .. }
        | cli::Commands::Logs { .. }
        | cli::Commands::Extract(_)
        | cli::Commands::Validate(_) => false,
    }
}
