//! Watch a rollout to its verdict

use super::TargetArgs;
use crate::config::RolloutConfig;
use crate::error::{CliError, CliResult};
use crate::output::{print_debug_logs, print_error, print_info, print_message_block, print_success, print_warning};
use crate::watch::{FileManifests, WatchOutcome, Watcher};
use chrono::Utc;
use clap::Args;
use kdeploy_resources::{DaemonSet, InMemoryLogSource, Syncable};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// YAML map of pod -> container -> log lines, used for debug output
    #[arg(long)]
    pub logs: Option<PathBuf>,

    /// Seconds between sync cycles
    #[arg(long)]
    pub interval: Option<u64>,

    /// Give up after this many seconds instead of the DaemonSet timeout
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Poll until a verdict and print it; returns the process exit code
pub async fn execute(args: WatchArgs, config: &RolloutConfig) -> CliResult<i32> {
    let interval = args
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.poll_interval());
    let timeout = args.timeout.map(Duration::from_secs).or_else(|| config.timeout());

    let mut ds = DaemonSet::new(args.target.identity())
        .with_deploy_started_at(Utc::now())
        .with_log_tail_lines(config.log_tail_lines);

    print_info(&format!("Watching {} (every {}s)", ds.identity(), interval.as_secs()));

    let outcome = Watcher::new(FileManifests::new(&args.target.manifests), interval)
        .with_timeout(timeout)
        .run(&mut ds)
        .await?;

    match outcome {
        WatchOutcome::Succeeded => {
            print_success(&format!("{} rolled out: {}", ds.identity(), ds.status()));
        }
        WatchOutcome::Failed => {
            print_error(&format!("{} failed: {}", ds.identity(), ds.status()));
            if let Some(message) = ds.failure_message() {
                print_message_block("Failures:", &message);
            }
            print_logs(&ds, args.logs.as_deref()).await;
        }
        WatchOutcome::TimedOut => {
            print_warning(&format!("{} timed out: {}", ds.identity(), ds.status()));
            print_message_block("Timeout:", &ds.timeout_message());
            print_logs(&ds, args.logs.as_deref()).await;
        }
    }

    Ok(outcome.exit_code())
}

async fn print_logs(ds: &DaemonSet, logs: Option<&Path>) {
    if !ds.can_print_debug_logs() {
        return;
    }
    let Some(path) = logs else {
        print_info("No --logs file given; skipping debug logs");
        return;
    };

    match fetch_logs(ds, path).await {
        Ok(logs) => print_debug_logs(&logs),
        Err(e) => warn!(error = %e, "Could not fetch debug logs"),
    }
}

async fn fetch_logs(ds: &DaemonSet, path: &Path) -> CliResult<kdeploy_resources::DebugLogs> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let source = InMemoryLogSource::from_yaml(&text)?;
    Ok(ds.fetch_debug_logs(&source).await?)
}
