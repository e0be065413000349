mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{check::CheckArgs, run::RunArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hwbot",
    about = "Watch a homework review status and forward every change to Telegram",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (default: built-in settings)
    #[arg(long, global = true, env = "HWBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the review status until interrupted
    Run(RunArgs),

    /// Validate the config and report which credentials are set
    Check(CheckArgs),

    /// Show the status → verdict table
    Verdicts,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run(args) => cmd::run::run(config_path, args),
        Commands::Check(args) => cmd::check::run(config_path, args, cli.json),
        Commands::Verdicts => cmd::verdicts::run(config_path, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
