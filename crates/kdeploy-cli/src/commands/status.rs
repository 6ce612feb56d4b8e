//! One-shot status check

use super::TargetArgs;
use crate::config::RolloutConfig;
use crate::error::CliResult;
use crate::output::{colorize_state, print_message_block};
use crate::watch::{FileManifests, ManifestSource};
use kdeploy_resources::{DaemonSet, RolloutState, Syncable};

/// Sync once and print the verdict; returns the process exit code
pub async fn execute(target: TargetArgs, config: &RolloutConfig) -> CliResult<i32> {
    let cache = FileManifests::new(&target.manifests).load().await?;

    let mut ds = DaemonSet::new(target.identity()).with_log_tail_lines(config.log_tail_lines);
    ds.sync(&cache).await;

    let state = ds.rollout_state();
    println!("{}: {}", ds.identity(), colorize_state(state));
    println!("  {}", ds.status());

    if let Some(message) = ds.failure_message() {
        print_message_block("Failures:", &message);
    }

    Ok(exit_code(state))
}

fn exit_code(state: RolloutState) -> i32 {
    match state {
        RolloutState::Succeeded | RolloutState::Progressing => 0,
        RolloutState::Failed | RolloutState::NotFound | RolloutState::Unknown => 1,
    }
}
