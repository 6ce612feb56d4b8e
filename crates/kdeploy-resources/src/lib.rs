//! # kdeploy Resources - Rollout verdicts for watched resources
//!
//! A deploy run submits manifests and then polls every resource it touched
//! until each one reports success, failure, or runs out of time. This crate
//! holds the per-kind logic that turns cached cluster state into those
//! verdicts.
//!
//! ## Key Components
//!
//! - [`Syncable`]: the capability every watched kind implements
//! - [`DaemonSet`]: rollout evaluator for node-scoped workloads
//! - [`Pod`]: pod lifecycle (readiness, doomed containers, timeouts)
//! - [`NodeRegistry`]: node inventory rebuilt each cycle
//! - [`ownership`]: which pods belong to the current template revision
//! - [`debug_target`]: which pod to pull logs from when things go wrong
//!
//! ## Example
//!
//! ```rust,no_run
//! use kdeploy_cache::InMemoryResourceCache;
//! use kdeploy_resources::{DaemonSet, Syncable};
//! use kdeploy_types::ResourceIdentity;
//!
//! # async fn example(manifests: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let cache = InMemoryResourceCache::from_manifests(manifests)?;
//! let mut ds = DaemonSet::new(ResourceIdentity::daemon_set("kube-system", "fluentd"));
//!
//! ds.sync(&cache).await;
//! println!("{}: {}", ds.rollout_state(), ds.status());
//! # Ok(())
//! # }
//! ```
//!
//! ## Staleness
//!
//! DaemonSet status is written asynchronously by the controller. A verdict
//! is only reported once `status.observedGeneration` has caught up with
//! `metadata.generation`; until then the rollout stays `Progressing` even if
//! the counters look finished or a pod looks broken.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod daemon_set;
pub mod debug_target;
pub mod error;
pub mod logs;
pub mod node;
pub mod ownership;
pub mod pod;
pub mod rollout;
pub mod syncable;
pub mod workload;

// Re-export main types
pub use daemon_set::{DaemonSet, DAEMON_SET_TIMEOUT};
pub use debug_target::{select_debug_target, DebugCandidate};
pub use error::{ResourceError, Result};
pub use logs::{
    ContainerLogs, DebugLogs, InMemoryLogSource, LogQuery, PodLogSource, DEFAULT_LOG_TAIL_LINES,
};
pub use node::{NodeRecord, NodeRegistry};
pub use ownership::belongs_to;
pub use pod::{Pod, POD_TIMEOUT};
pub use rollout::RolloutState;
pub use syncable::{Syncable, NOT_FOUND_STATUS, STANDARD_TIMEOUT_MESSAGE};
pub use workload::WorkloadSnapshot;
