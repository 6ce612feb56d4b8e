//! kdeploy-rollout - Watch a DaemonSet rollout to its verdict
//!
//! Reads a cluster snapshot (the DaemonSet, its pods and the nodes) from a
//! multi-document manifest file and reports whether the rollout succeeded,
//! failed, or is still progressing. `watch` re-reads the file every cycle
//! until a verdict or a timeout.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod watch;

use commands::{status, watch as watch_cmd, TargetArgs};
use config::RolloutConfig;
use error::CliResult;

/// kdeploy rollout CLI
#[derive(Parser)]
#[command(name = "kdeploy-rollout")]
#[command(about = "kdeploy - DaemonSet rollout verdicts", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "KDEPLOY_CONFIG")]
    config: Option<String>,

    /// Log level (overrides configuration)
    #[arg(long, env = "KDEPLOY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "KDEPLOY_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Sync once and print the rollout status
    Status(TargetArgs),

    /// Poll until the rollout succeeds, fails or times out
    Watch(watch_cmd::WatchArgs),
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = RolloutConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let code = match cli.command {
        Commands::Status(target) => status::execute(target, &config).await?,
        Commands::Watch(args) => watch_cmd::execute(args, &config).await?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
