//! Rollout state derived from the verdict predicates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a rollout stands as of the last sync.
///
/// Nothing is retained between cycles: the state is recomputed from the
/// predicates each time, so it can move backwards if the cluster does. The
/// orchestrator treats the first terminal state it sees as final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutState {
    /// Not synced yet
    Unknown,
    /// The workload is absent from the cache
    NotFound,
    Progressing,
    Succeeded,
    Failed,
}

impl fmt::Display for RolloutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RolloutState::Unknown => "Unknown",
            RolloutState::NotFound => "Not Found",
            RolloutState::Progressing => "Progressing",
            RolloutState::Succeeded => "Succeeded",
            RolloutState::Failed => "Failed",
        };
        f.write_str(label)
    }
}
